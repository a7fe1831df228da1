
use serde::{Deserialize, Serialize};

/// A 1-based, inclusive span on a chromosome
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct GenomicRange {
    /// Chromosome string
    chrom: String,
    /// 1-based start, inclusive
    start: u64,
    /// 1-based end, inclusive
    end: u64
}

impl GenomicRange {
    /// Typical constructor with some verification
    /// # Panics
    /// * if `start` is 0 or greater than `end`
    pub fn new(chrom: String, start: u64, end: u64) -> GenomicRange {
        assert!(start >= 1);
        assert!(start <= end);
        GenomicRange {
            chrom, start, end
        }
    }

    /// Fallible constructor for coordinates that come from user data
    pub fn try_new(chrom: String, start: u64, end: u64) -> Option<GenomicRange> {
        if start >= 1 && start <= end {
            Some(GenomicRange { chrom, start, end })
        } else {
            None
        }
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bases covered by the range
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false, ranges cover at least one base
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for GenomicRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genomic_range() {
        let range = GenomicRange::new("6".to_string(), 123456, 123458);
        assert_eq!(range.chrom(), "6");
        assert_eq!(range.len(), 3);
        assert_eq!(range.to_string(), "6:123456-123458");
    }

    #[test]
    fn test_try_new() {
        assert!(GenomicRange::try_new("1".to_string(), 1, 1).is_some());
        assert!(GenomicRange::try_new("1".to_string(), 0, 1).is_none());
        assert!(GenomicRange::try_new("1".to_string(), 10, 5).is_none());
    }

    #[test]
    #[should_panic]
    fn test_bad_range() {
        let _range = GenomicRange::new("1".to_string(), 10, 5);
    }

    #[test]
    #[should_panic]
    fn test_zero_start() {
        let _range = GenomicRange::new("1".to_string(), 0, 5);
    }
}
