
use log::{debug, info};
use rust_htslib::faidx;
use rust_lib_reference_genome::reference_genome::ReferenceGenome;
use rustc_hash::FxHashMap as HashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::util::file_io::index_fasta;
use crate::util::sequence::normalize_fetched;

/// Failures from a reference lookup
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ReferenceError {
    #[error("contig {0:?} is not in the reference")]
    MissingContig(String),
    #[error("{chrom}:{start}-{end} is outside of the reference coordinates")]
    OutOfRange { chrom: String, start: u64, end: u64 },
    #[error("expected {expected} bases at {chrom}:{start}, reference returned {found}")]
    LengthMismatch { chrom: String, start: u64, expected: u64, found: u64 },
    #[error("reference backend error: {0}")]
    Backend(String)
}

/// Random-access lookup into a reference sequence.
/// Coordinates are 1-based and inclusive, the returned sequence is uppercase and exactly `end - start + 1` long.
pub trait ReferenceAccessor {
    /// Fetches the bases in `chrom:start-end`
    /// # Errors
    /// * if the contig is unknown or the range falls outside of it
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Result<String, ReferenceError>;

    /// Convenience wrapper for a single base
    fn fetch_base(&self, chrom: &str, position: u64) -> Result<String, ReferenceError> {
        self.fetch(chrom, position, position)
    }
}

impl<T: ReferenceAccessor + ?Sized> ReferenceAccessor for &T {
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Result<String, ReferenceError> {
        (**self).fetch(chrom, start, end)
    }
}

/// Shared range checks, converting 1-based inclusive into 0-based half-open
fn zero_based_span(chrom: &str, start: u64, end: u64, contig_len: u64) -> Result<(usize, usize), ReferenceError> {
    if start == 0 || start > end || end > contig_len {
        return Err(ReferenceError::OutOfRange { chrom: chrom.to_string(), start, end });
    }
    Ok(((start - 1) as usize, end as usize))
}

impl ReferenceAccessor for ReferenceGenome {
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Result<String, ReferenceError> {
        if !self.contig_keys().iter().any(|k| k == chrom) {
            return Err(ReferenceError::MissingContig(chrom.to_string()));
        }
        let chrom_seq = self.get_full_chromosome(chrom);
        let (zstart, zend) = zero_based_span(chrom, start, end, chrom_seq.len() as u64)?;
        normalize_fetched(&chrom_seq[zstart..zend])
            .map_err(|e| ReferenceError::Backend(e.to_string()))
    }
}

/// A reference backed by an indexed FASTA (`.fai`) through htslib.
/// Each handle owns its own htslib reader, so parallel callers should open one per worker.
pub struct IndexedReference {
    /// the htslib reader
    reader: faidx::Reader,
    /// contig lengths from the `.fai`, htslib does not guard unknown contigs for us
    contig_lengths: HashMap<String, u64>
}

impl IndexedReference {
    /// Opens the FASTA, building the `.fai` alongside it if it does not exist yet
    /// # Errors
    /// * if the index cannot be built or parsed
    /// * if htslib cannot open the file
    pub fn from_path(filename: &Path) -> Result<IndexedReference, Box<dyn std::error::Error>> {
        let index_filename = fai_filename(filename);
        if !index_filename.exists() {
            info!("Building FASTA index at {index_filename:?}...");
            index_fasta(filename)?;
        }

        debug!("Opening indexed reference {filename:?}");
        let contig_lengths = load_fai_lengths(&index_filename)?;
        let reader = faidx::Reader::from_path(filename)?;
        Ok(IndexedReference { reader, contig_lengths })
    }

    /// Contig names and lengths known to the index
    pub fn contig_lengths(&self) -> &HashMap<String, u64> {
        &self.contig_lengths
    }
}

impl ReferenceAccessor for IndexedReference {
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Result<String, ReferenceError> {
        let contig_len = *self.contig_lengths.get(chrom)
            .ok_or_else(|| ReferenceError::MissingContig(chrom.to_string()))?;
        let (zstart, zend) = zero_based_span(chrom, start, end, contig_len)?;

        // htslib wants 0-based inclusive coordinates here
        let sequence = self.reader.fetch_seq_string(chrom, zstart, zend - 1)
            .map_err(|e| ReferenceError::Backend(e.to_string()))?;
        let expected = end - start + 1;
        if sequence.len() as u64 != expected {
            return Err(ReferenceError::LengthMismatch {
                chrom: chrom.to_string(),
                start,
                expected,
                found: sequence.len() as u64
            });
        }
        Ok(sequence.to_ascii_uppercase())
    }
}

/// Location of the htslib index for a FASTA file
pub fn fai_filename(filename: &Path) -> PathBuf {
    let mut index_filename = filename.as_os_str().to_owned();
    index_filename.push(".fai");
    PathBuf::from(index_filename)
}

/// One row of a `.fai`, only the leading columns matter here
#[derive(Debug, Deserialize)]
struct FaiRow {
    name: String,
    length: u64,
    _offset: u64,
    _line_bases: u64,
    _line_width: u64
}

/// Loads the contig lengths from a `.fai` index
/// # Errors
/// * if the file cannot be opened or a row does not parse
fn load_fai_lengths(index_filename: &Path) -> Result<HashMap<String, u64>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(index_filename)?;
    let mut lengths: HashMap<String, u64> = Default::default();
    for row in reader.deserialize() {
        let row: FaiRow = row?;
        lengths.insert(row.name, row.length);
    }
    Ok(lengths)
}

/// A pre-fetched reference fragment on one contig.
/// Useful when the caller already holds the context around a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceFragment {
    /// contig the fragment comes from
    chrom: String,
    /// 1-based coordinate of the first base in `sequence`
    start: u64,
    /// uppercase bases
    sequence: String
}

impl ReferenceFragment {
    /// Constructor
    /// # Arguments
    /// * `chrom` - the contig of the fragment
    /// * `start` - 1-based position of the first base
    /// * `sequence` - the bases, any case
    pub fn new(chrom: String, start: u64, sequence: &str) -> ReferenceFragment {
        assert!(start >= 1);
        ReferenceFragment {
            chrom,
            start,
            sequence: sequence.to_ascii_uppercase()
        }
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }
}

impl ReferenceAccessor for ReferenceFragment {
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Result<String, ReferenceError> {
        if chrom != self.chrom {
            return Err(ReferenceError::MissingContig(chrom.to_string()));
        }
        if start < self.start {
            return Err(ReferenceError::OutOfRange { chrom: chrom.to_string(), start, end });
        }

        // shift into fragment-local coordinates
        let offset = self.start - 1;
        let (zstart, zend) = zero_based_span(chrom, start - offset, end.saturating_sub(offset), self.sequence.len() as u64)
            .map_err(|_e| ReferenceError::OutOfRange { chrom: chrom.to_string(), start, end })?;
        Ok(self.sequence[zstart..zend].to_string())
    }
}
