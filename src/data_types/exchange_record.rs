
use crate::codec::errors::CodecError;
use crate::data_types::exchange_mutation::ExchangeMutation;

/// A single exchange (VCF) row as seen by the importer, decoupled from htslib
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExchangeRecord {
    /// the ID column, "." or empty when absent
    id: String,
    /// chromosome name
    chrom: String,
    /// 1-based position
    position: u64,
    /// REF allele
    reference: String,
    /// ALT alleles, in file order
    alternates: Vec<String>,
    /// raw annotation INFO value, if present
    annotation: Option<String>
}

impl ExchangeRecord {
    /// Constructor
    /// # Arguments
    /// * `id` - the record identifier
    /// * `chrom` - the chromosome
    /// * `position` - 1-based position of REF
    /// * `reference` - the REF allele
    /// * `alternates` - the ALT alleles
    /// * `annotation` - the raw annotation INFO value
    pub fn new(id: String, chrom: String, position: u64, reference: String, alternates: Vec<String>, annotation: Option<String>) -> ExchangeRecord {
        ExchangeRecord {
            id,
            chrom,
            position,
            reference,
            alternates,
            annotation
        }
    }

    /// Builds the exchange mutation for the first ALT allele
    /// # Errors
    /// * if there is no ALT allele, or the alleles are empty or the position is 0
    pub fn first_mutation(&self) -> Result<ExchangeMutation, CodecError> {
        let unsupported = |alternate: &str| CodecError::UnsupportedAlleles {
            chrom: self.chrom.clone(),
            position: self.position,
            reference: self.reference.clone(),
            alternate: alternate.to_string()
        };
        let alternate = self.alternates.first()
            .ok_or_else(|| unsupported(""))?;
        if self.position == 0 || self.reference.is_empty() || alternate.is_empty() {
            return Err(unsupported(alternate));
        }
        Ok(ExchangeMutation::new(self.chrom.clone(), self.position, self.reference.clone(), alternate.clone()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn alternates(&self) -> &[String] {
        &self.alternates
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_mutation() {
        let record = ExchangeRecord::new(
            "MU1".to_string(), "6".to_string(), 123455,
            "ATTC".to_string(), vec!["A".to_string(), "AT".to_string()], None
        );
        let mutation = record.first_mutation().unwrap();
        assert_eq!(mutation.canonical_notation(), "ATTC>A");
        assert_eq!(record.annotation(), None);
    }

    #[test]
    fn test_no_alternate() {
        let record = ExchangeRecord::new(
            "MU1".to_string(), "6".to_string(), 123455,
            "A".to_string(), vec![], Some("".to_string())
        );
        assert!(matches!(record.first_mutation(), Err(CodecError::UnsupportedAlleles { .. })));

        let record = ExchangeRecord::new(
            "MU1".to_string(), "6".to_string(), 0,
            "A".to_string(), vec!["C".to_string()], None
        );
        assert!(record.first_mutation().is_err());
    }
}
