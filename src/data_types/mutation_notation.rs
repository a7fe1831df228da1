
use serde::{Deserialize, Serialize};

use crate::util::sequence::is_nucleotide_sequence;

/// Separates the deleted and inserted sides of a notation token
pub const NOTATION_DELIMITER: char = '>';
/// Placeholder for an empty side of a notation token
pub const MISSING_ALLELE: &str = "-";

/// The class of a mutation in the internal notation
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumString)]
pub enum MutationClass {
    /// Replacement of one or more bases with the same number of bases
    #[strum(to_string = "substitution", serialize = "single base substitution", serialize = "multiple base substitution (>=2bp and <=200bp)", serialize = "SNV", serialize = "MNV")]
    Substitution,
    /// Bases added between two reference bases
    #[strum(to_string = "insertion", serialize = "insertion of <=200bp", serialize = "INS")]
    Insertion,
    /// Reference bases removed
    #[strum(to_string = "deletion", serialize = "deletion of <=200bp", serialize = "DEL")]
    Deletion
}

/// Reasons a notation token can be rejected
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum NotationError {
    #[error("missing '>' delimiter")]
    MissingDelimiter,
    #[error("more than one '>' delimiter")]
    ExtraDelimiter,
    #[error("both sides of the token are empty")]
    EmptyToken,
    #[error("unexpected characters in {0:?}, only A, C, G, T, N are allowed")]
    InvalidBases(String),
    #[error("token implies {found} but {expected} was declared")]
    ClassMismatch { expected: MutationClass, found: String },
    #[error("substitution sides differ in length: {deleted:?} vs {inserted:?}")]
    UnequalSubstitution { deleted: String, inserted: String },
    #[error("range covers {span} bases but the token replaces {deleted:?}")]
    SpanMismatch { span: u64, deleted: String }
}

/// A compact internal mutation token, e.g. `TTC>-`, `->A`, or `C>T`
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct MutationNotation {
    /// bases removed from the reference, empty for insertions
    deleted: String,
    /// bases added, empty for deletions
    inserted: String,
    /// the inferred class
    class: MutationClass
}

impl MutationNotation {
    /// Parses a token and infers its class from which sides are empty.
    /// # Arguments
    /// * `token` - the `<deleted>><inserted>` token, `-` marks an empty side
    /// # Errors
    /// * if the token has no delimiter or more than one
    /// * if both sides are empty
    /// * if either side contains characters outside `ACGTN`
    /// * if a substitution has sides of different lengths
    pub fn parse(token: &str) -> Result<MutationNotation, NotationError> {
        let (deleted, inserted) = split_token(token)?;
        let class = match (deleted.is_empty(), inserted.is_empty()) {
            (true, true) => return Err(NotationError::EmptyToken),
            (true, false) => MutationClass::Insertion,
            (false, true) => MutationClass::Deletion,
            (false, false) => {
                if deleted.len() != inserted.len() {
                    return Err(NotationError::UnequalSubstitution {
                        deleted: deleted.to_string(),
                        inserted: inserted.to_string()
                    });
                }
                MutationClass::Substitution
            }
        };

        Ok(MutationNotation {
            deleted: deleted.to_string(),
            inserted: inserted.to_string(),
            class
        })
    }

    /// Parses a token and verifies that it matches the declared class.
    /// # Arguments
    /// * `token` - the notation token
    /// * `expected` - the class declared alongside the token
    /// # Errors
    /// * if the token does not parse
    /// * if the parsed class is not `expected`
    pub fn parse_as(token: &str, expected: MutationClass) -> Result<MutationNotation, NotationError> {
        let notation = Self::parse(token)?;
        if notation.class != expected {
            return Err(NotationError::ClassMismatch {
                expected,
                found: notation.class.to_string()
            });
        }
        Ok(notation)
    }

    /// Builds the token from a reference allele and a variant allele, `-` or empty marking a missing side.
    /// This is how simple germline variants describe a mutation.
    /// # Arguments
    /// * `reference_allele` - the reference side
    /// * `variant_allele` - the observed side
    pub fn create_mutation(reference_allele: &str, variant_allele: &str) -> String {
        let from = if reference_allele.is_empty() { MISSING_ALLELE } else { reference_allele };
        let to = if variant_allele.is_empty() { MISSING_ALLELE } else { variant_allele };
        format!("{from}{NOTATION_DELIMITER}{to}")
    }

    pub fn deleted(&self) -> &str {
        &self.deleted
    }

    pub fn inserted(&self) -> &str {
        &self.inserted
    }

    pub fn class(&self) -> MutationClass {
        self.class
    }
}

impl std::fmt::Display for MutationNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::create_mutation(&self.deleted, &self.inserted))
    }
}

/// Splits a token into its two sides, mapping `-` to the empty string.
/// Both sides are validated against the nucleotide alphabet.
/// # Errors
/// * if the delimiter is missing or repeated
/// * if a side contains non-nucleotide characters
pub fn split_token(token: &str) -> Result<(&str, &str), NotationError> {
    let mut parts = token.split(NOTATION_DELIMITER);
    let (deleted, inserted) = match (parts.next(), parts.next(), parts.next()) {
        (Some(d), Some(i), None) => (d, i),
        (_, None, _) => return Err(NotationError::MissingDelimiter),
        _ => return Err(NotationError::ExtraDelimiter)
    };

    let validate = |side: &str| -> Result<(), NotationError> {
        if side == MISSING_ALLELE || is_nucleotide_sequence(side) {
            Ok(())
        } else {
            Err(NotationError::InvalidBases(side.to_string()))
        }
    };
    validate(deleted)?;
    validate(inserted)?;

    let deleted = if deleted == MISSING_ALLELE { "" } else { deleted };
    let inserted = if inserted == MISSING_ALLELE { "" } else { inserted };
    Ok((deleted, inserted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_deletion() {
        let notation = MutationNotation::parse("TTC>-").unwrap();
        assert_eq!(notation.deleted(), "TTC");
        assert_eq!(notation.inserted(), "");
        assert_eq!(notation.class(), MutationClass::Deletion);
        assert_eq!(notation.to_string(), "TTC>-");
    }

    #[test]
    fn test_parse_insertion() {
        let notation = MutationNotation::parse("->A").unwrap();
        assert_eq!(notation.deleted(), "");
        assert_eq!(notation.inserted(), "A");
        assert_eq!(notation.class(), MutationClass::Insertion);
    }

    #[test]
    fn test_parse_substitution() {
        let notation = MutationNotation::parse("C>T").unwrap();
        assert_eq!(notation.deleted(), "C");
        assert_eq!(notation.inserted(), "T");
        assert_eq!(notation.class(), MutationClass::Substitution);

        let mnv = MutationNotation::parse("AC>GT").unwrap();
        assert_eq!(mnv.class(), MutationClass::Substitution);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MutationNotation::parse("CT"), Err(NotationError::MissingDelimiter));
        assert_eq!(MutationNotation::parse("C>T>A"), Err(NotationError::ExtraDelimiter));
        assert_eq!(MutationNotation::parse("->-"), Err(NotationError::EmptyToken));
        assert_eq!(MutationNotation::parse(">"), Err(NotationError::EmptyToken));
        assert_eq!(MutationNotation::parse("c>T"), Err(NotationError::InvalidBases("c".to_string())));
        assert_eq!(MutationNotation::parse("C>R"), Err(NotationError::InvalidBases("R".to_string())));
        assert!(matches!(MutationNotation::parse("CA>T"), Err(NotationError::UnequalSubstitution { .. })));
    }

    #[test]
    fn test_parse_as() {
        assert!(MutationNotation::parse_as("TTC>-", MutationClass::Deletion).is_ok());
        assert_eq!(
            MutationNotation::parse_as("TTC>-", MutationClass::Insertion),
            Err(NotationError::ClassMismatch { expected: MutationClass::Insertion, found: "deletion".to_string() })
        );
        // the original warehouse sometimes wrote insertions with a reference side
        assert!(MutationNotation::parse_as("N>A", MutationClass::Insertion).is_err());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(MutationClass::from_str("single base substitution").unwrap(), MutationClass::Substitution);
        assert_eq!(MutationClass::from_str("multiple base substitution (>=2bp and <=200bp)").unwrap(), MutationClass::Substitution);
        assert_eq!(MutationClass::from_str("insertion of <=200bp").unwrap(), MutationClass::Insertion);
        assert_eq!(MutationClass::from_str("deletion of <=200bp").unwrap(), MutationClass::Deletion);
        assert_eq!(MutationClass::from_str("DEL").unwrap(), MutationClass::Deletion);
        assert!(MutationClass::from_str("inversion").is_err());
    }

    #[test]
    fn test_create_mutation() {
        assert_eq!(MutationNotation::create_mutation("A", "T"), "A>T");
        assert_eq!(MutationNotation::create_mutation("-", "T"), "->T");
        assert_eq!(MutationNotation::create_mutation("", "T"), "->T");
        assert_eq!(MutationNotation::create_mutation("AC", ""), "AC>-");
    }
}
