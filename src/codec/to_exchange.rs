
use log::trace;

use crate::codec::errors::CodecError;
use crate::data_types::coordinates::GenomicRange;
use crate::data_types::exchange_mutation::ExchangeMutation;
use crate::data_types::mutation_notation::{MutationClass, MutationNotation, NotationError};
use crate::reference::ReferenceAccessor;

/// Converts an internal-notation mutation into its left-anchored exchange form.
/// Indels borrow the reference base immediately upstream of the span as the anchor; at position 1 there is no
/// upstream base, so the first base after the event is used instead.
/// Substitutions are read in the token's own order and never consult the reference.
/// # Arguments
/// * `range` - the 1-based inclusive span of the mutation
/// * `token` - the `<deleted>><inserted>` notation token
/// * `class` - the declared mutation class
/// * `reference` - the accessor used to look up anchor bases
/// # Errors
/// * `InvalidNotation` if the token does not parse into the parts implied by `class`,
///   or if a deletion or substitution replaces a different number of bases than `range` covers
/// * `ReferenceUnavailable` if the anchor base cannot be fetched
pub fn to_exchange_mutation(
    range: &GenomicRange, token: &str, class: MutationClass, reference: &dyn ReferenceAccessor
) -> Result<ExchangeMutation, CodecError> {
    let invalid = |reason| CodecError::InvalidNotation {
        chrom: range.chrom().to_string(),
        start: range.start(),
        token: token.to_string(),
        reason
    };
    let notation = MutationNotation::parse_as(token, class)
        .map_err(invalid)?;

    // insertions sit between bases, everything else must replace exactly the range
    if class != MutationClass::Insertion && notation.deleted().len() as u64 != range.len() {
        return Err(invalid(NotationError::SpanMismatch {
            span: range.len(),
            deleted: notation.deleted().to_string()
        }));
    }

    let chrom = range.chrom().to_string();
    let start = range.start();
    let deleted = notation.deleted();
    let inserted = notation.inserted();

    let mutation = match class {
        MutationClass::Substitution => {
            ExchangeMutation::new(chrom, start, deleted.to_string(), inserted.to_string())
        },
        MutationClass::Deletion => {
            if start > 1 {
                let anchor = fetch_anchor(reference, range, start - 1)?;
                ExchangeMutation::new(chrom, start - 1, format!("{anchor}{deleted}"), anchor)
            } else {
                // first base of the contig, anchor on the base after the deleted span
                let anchor = fetch_anchor(reference, range, range.end() + 1)?;
                ExchangeMutation::new(chrom, 1, format!("{deleted}{anchor}"), anchor)
            }
        },
        MutationClass::Insertion => {
            if start > 1 {
                let anchor = fetch_anchor(reference, range, start - 1)?;
                let alternate = format!("{anchor}{inserted}");
                ExchangeMutation::new(chrom, start - 1, anchor, alternate)
            } else {
                // inserting before the first base, which then becomes the anchor
                let anchor = fetch_anchor(reference, range, 1)?;
                let alternate = format!("{inserted}{anchor}");
                ExchangeMutation::new(chrom, 1, anchor, alternate)
            }
        }
    };

    trace!("{range} {token} => {}:{} {}", mutation.chrom(), mutation.position(), mutation.canonical_notation());
    Ok(mutation)
}

/// Fetches the single anchor base, wrapping accessor failures with the record's coordinates
fn fetch_anchor(reference: &dyn ReferenceAccessor, range: &GenomicRange, position: u64) -> Result<String, CodecError> {
    reference.fetch_base(range.chrom(), position)
        .map_err(|reason| CodecError::ReferenceUnavailable {
            chrom: range.chrom().to_string(),
            start: position,
            end: position,
            reason
        })
}
