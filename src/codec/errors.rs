
use crate::data_types::mutation_notation::NotationError;
use crate::reference::ReferenceError;

/// Errors that can be produced while converting a single record between notations.
/// None of these are fatal to a stream, callers skip the record and count it.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("invalid notation {token:?} at {chrom}:{start}: {reason}")]
    InvalidNotation { chrom: String, start: u64, token: String, reason: NotationError },
    #[error("reference unavailable for {chrom}:{start}-{end}: {reason}")]
    ReferenceUnavailable { chrom: String, start: u64, end: u64, reason: ReferenceError },
    #[error("alleles {reference:?}/{alternate:?} at {chrom}:{position} cannot be expressed in the internal notation")]
    UnsupportedAlleles { chrom: String, position: u64, reference: String, alternate: String }
}

/// A single effect entry inside an annotation field that could not be parsed.
/// The entry is dropped, the rest of the field is still processed.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[error("malformed annotation entry {entry:?}: {reason}")]
pub struct AnnotationEntryParseError {
    /// the raw entry text
    pub entry: String,
    /// why it was rejected
    pub reason: String
}

impl AnnotationEntryParseError {
    pub fn new(entry: &str, reason: impl Into<String>) -> AnnotationEntryParseError {
        AnnotationEntryParseError {
            entry: entry.to_string(),
            reason: reason.into()
        }
    }
}
