
use serde::Serialize;
use std::collections::BTreeSet;

use crate::codec::errors::CodecError;
use crate::data_types::coordinates::GenomicRange;
use crate::data_types::mutation_notation::{MutationNotation, NOTATION_DELIMITER};

/// A variant in exchange (VCF) form: one left-anchored position with REF/ALT alleles
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ExchangeMutation {
    /// chromosome of the variant
    chrom: String,
    /// 1-based position of the first REF base
    position: u64,
    /// reference allele(s), a singleton in practice
    reference_alleles: BTreeSet<String>,
    /// alternate allele
    alternate_allele: String,
    /// `REF>ALT`
    canonical_notation: String
}

impl ExchangeMutation {
    /// Constructor, the canonical notation is derived from the alleles
    /// # Arguments
    /// * `chrom` - the chromosome
    /// * `position` - the 1-based VCF position
    /// * `reference` - the REF allele
    /// * `alternate` - the ALT allele
    /// # Panics
    /// * if either allele is empty or the position is 0
    pub fn new(chrom: String, position: u64, reference: String, alternate: String) -> ExchangeMutation {
        assert!(position >= 1);
        assert!(!reference.is_empty() && !alternate.is_empty());
        let canonical_notation = format!("{reference}{NOTATION_DELIMITER}{alternate}");
        ExchangeMutation {
            chrom,
            position,
            reference_alleles: BTreeSet::from([reference]),
            alternate_allele: alternate,
            canonical_notation
        }
    }

    /// Splits a canonical `REF>ALT` notation back into its alleles
    pub fn parse_canonical(notation: &str) -> Option<(String, String)> {
        let (reference, alternate) = notation.split_once(NOTATION_DELIMITER)?;
        if reference.is_empty() || alternate.is_empty() || alternate.contains(NOTATION_DELIMITER) {
            None
        } else {
            Some((reference.to_string(), alternate.to_string()))
        }
    }

    /// Maps this exchange record back into internal coordinates and a notation token.
    /// Left anchoring is preferred; right anchoring is only accepted at position 1 where VCF requires it.
    /// # Errors
    /// * if the alleles are identical, or differ in length without a shared anchor base
    pub fn to_internal(&self) -> Result<(GenomicRange, MutationNotation), CodecError> {
        let reference = self.reference_allele();
        let alternate = self.alternate_allele.as_str();
        let unsupported = || CodecError::UnsupportedAlleles {
            chrom: self.chrom.clone(),
            position: self.position,
            reference: reference.to_string(),
            alternate: alternate.to_string()
        };

        let (start, end, deleted, inserted) = if reference.len() == alternate.len() {
            if reference == alternate {
                return Err(unsupported());
            }
            let end = self.position + reference.len() as u64 - 1;
            (self.position, end, reference, alternate)
        } else if alternate.len() == 1 && reference.len() > 1 {
            if reference.starts_with(alternate) {
                let deleted = &reference[1..];
                (self.position + 1, self.position + deleted.len() as u64, deleted, "")
            } else if self.position == 1 && reference.ends_with(alternate) {
                let deleted = &reference[..reference.len() - 1];
                (1, deleted.len() as u64, deleted, "")
            } else {
                return Err(unsupported());
            }
        } else if reference.len() == 1 && alternate.len() > 1 {
            if alternate.starts_with(reference) {
                (self.position + 1, self.position + 1, "", &alternate[1..])
            } else if self.position == 1 && alternate.ends_with(reference) {
                (1, 1, "", &alternate[..alternate.len() - 1])
            } else {
                return Err(unsupported());
            }
        } else {
            return Err(unsupported());
        };

        let token = MutationNotation::create_mutation(deleted, inserted);
        let notation = MutationNotation::parse(&token)
            .map_err(|reason| CodecError::InvalidNotation {
                chrom: self.chrom.clone(),
                start,
                token: token.clone(),
                reason
            })?;
        let range = GenomicRange::new(self.chrom.clone(), start, end);
        Ok((range, notation))
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn reference_alleles(&self) -> &BTreeSet<String> {
        &self.reference_alleles
    }

    /// The (first) reference allele
    pub fn reference_allele(&self) -> &str {
        self.reference_alleles.iter().next()
            .map(|s| s.as_str())
            .unwrap_or_default()
    }

    pub fn alternate_allele(&self) -> &str {
        &self.alternate_allele
    }

    pub fn canonical_notation(&self) -> &str {
        &self.canonical_notation
    }
}
