
use log::{debug, info, warn};
use rayon::prelude::*;
use rust_lib_reference_genome::reference_genome::ReferenceGenome;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::codec::codec_config::CodecOptions;
use crate::codec::errors::CodecError;
use crate::codec::to_exchange::to_exchange_mutation;
use crate::codec::vcf_writer::{write_exchange_vcf, ExportedRecord};
use crate::data_types::coordinates::GenomicRange;
use crate::data_types::mutation_notation::{split_token, MutationClass, MISSING_ALLELE};
use crate::reference::{IndexedReference, ReferenceAccessor};

/// One row of an internal-notation TSV
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct InternalMutationRow {
    pub mutation_id: String,
    pub chromosome: String,
    pub chromosome_start: u64,
    pub chromosome_end: u64,
    /// warehouse id or short form, e.g. `deletion of <=200bp` or `DEL`
    pub mutation_type: String,
    /// the notation token, e.g. `TTC>-`
    pub mutation: String,
    /// the submitted reference bases, `-` for insertions
    #[serde(default)]
    pub reference_genome_allele: Option<String>
}

/// Why a single row could not be exported
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RowError {
    #[error("unknown mutation type {0:?}")]
    UnknownMutationType(String),
    #[error("invalid range {chrom}:{start}-{end}")]
    InvalidRange { chrom: String, start: u64, end: u64 },
    #[error("failed to open reference: {0}")]
    ReferenceOpen(String),
    #[error(transparent)]
    Codec(#[from] CodecError)
}

/// Where exporting workers get their reference from
pub enum ReferenceSource<'a> {
    /// an indexed FASTA, each worker opens its own handle
    Indexed(&'a Path),
    /// a fully loaded reference, shared by all workers
    InMemory(&'a ReferenceGenome)
}

/// Counts for one export run
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ExportSummary {
    /// rows read from the input
    pub total_rows: usize,
    /// rows written to the VCF
    pub exported: usize,
    /// rows with an unknown type or an invalid range
    pub invalid_rows: usize,
    /// rows whose token did not parse as its declared class
    pub invalid_notation: usize,
    /// rows whose anchor base could not be fetched
    pub reference_unavailable: usize,
    /// rows that could not be converted for any other reason
    pub other_failures: usize
}

impl ExportSummary {
    fn count_failure(&mut self, error: &RowError) {
        match error {
            RowError::UnknownMutationType(_) |
            RowError::InvalidRange { .. } => self.invalid_rows += 1,
            RowError::Codec(CodecError::InvalidNotation { .. }) => self.invalid_notation += 1,
            RowError::Codec(CodecError::ReferenceUnavailable { .. }) => self.reference_unavailable += 1,
            RowError::ReferenceOpen(_) |
            RowError::Codec(CodecError::UnsupportedAlleles { .. }) => self.other_failures += 1
        };
    }

    /// Total rows that were skipped
    pub fn failed(&self) -> usize {
        self.invalid_rows + self.invalid_notation + self.reference_unavailable + self.other_failures
    }
}

/// Loads an internal-notation TSV with a header row
/// # Errors
/// * if the file cannot be opened or a row fails to deserialize
pub fn load_internal_rows(filename: &Path) -> Result<Vec<InternalMutationRow>, Box<dyn std::error::Error>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(filename)?;
    let mut rows = vec![];
    for row in csv_reader.deserialize() {
        let row: InternalMutationRow = row?;
        rows.push(row);
    }
    Ok(rows)
}

/// Converts a single row into its exchange form
/// # Arguments
/// * `row` - the internal-notation row
/// * `reference` - used to fetch anchor bases for indels
/// # Errors
/// * if the mutation type is unknown or the range is invalid
/// * if the conversion itself fails
pub fn convert_row(row: &InternalMutationRow, reference: &dyn ReferenceAccessor) -> Result<ExportedRecord, RowError> {
    let class: MutationClass = row.mutation_type.trim().parse()
        .map_err(|_e| RowError::UnknownMutationType(row.mutation_type.clone()))?;
    let range = GenomicRange::try_new(row.chromosome.clone(), row.chromosome_start, row.chromosome_end)
        .ok_or_else(|| RowError::InvalidRange {
            chrom: row.chromosome.clone(),
            start: row.chromosome_start,
            end: row.chromosome_end
        })?;

    if class == MutationClass::Substitution {
        if let (Some(submitted), Ok((deleted, _inserted))) = (row.reference_genome_allele.as_deref(), split_token(&row.mutation)) {
            if submitted != MISSING_ALLELE && submitted != deleted {
                debug!("{}: submitted reference allele {submitted:?} differs from {:?}, keeping the token order", row.mutation_id, row.mutation);
            }
        }
    }

    let mutation = to_exchange_mutation(&range, &row.mutation, class, reference)?;
    Ok(ExportedRecord::new(row.mutation_id.clone(), mutation, row.mutation.clone()))
}

/// Converts all rows on a dedicated pool, each worker holding the reference returned by `open_reference`.
/// Results are in input order.
fn convert_rows<A, F>(rows: &[InternalMutationRow], threads: usize, open_reference: F) -> Result<Vec<Result<ExportedRecord, RowError>>, Box<dyn std::error::Error>>
where
    A: ReferenceAccessor,
    F: Fn() -> Result<A, String> + Sync + Send
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    let results = pool.install(|| {
        rows.par_iter()
            .map_init(&open_reference, |reference, row| {
                match reference {
                    Ok(r) => convert_row(row, &*r),
                    Err(e) => Err(RowError::ReferenceOpen(e.clone()))
                }
            })
            .collect()
    });
    Ok(results)
}

/// Converts the rows and tallies the failures, without writing anything
/// # Arguments
/// * `rows` - the rows to convert
/// * `source` - where the reference comes from
/// * `threads` - number of worker threads
/// # Errors
/// * if the thread pool cannot be created
pub fn export_rows(rows: &[InternalMutationRow], source: ReferenceSource, threads: usize) -> Result<(Vec<ExportedRecord>, ExportSummary), Box<dyn std::error::Error>> {
    let results = match source {
        ReferenceSource::Indexed(path) => {
            // opening once up front builds any missing index before the workers race for it
            drop(IndexedReference::from_path(path)?);
            convert_rows(rows, threads, || IndexedReference::from_path(path).map_err(|e| e.to_string()))?
        },
        ReferenceSource::InMemory(reference_genome) => {
            convert_rows(rows, threads, || Ok(reference_genome))?
        }
    };

    let mut summary = ExportSummary {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut exported = Vec::with_capacity(rows.len());
    for (row, result) in rows.iter().zip(results) {
        match result {
            Ok(record) => exported.push(record),
            Err(e) => {
                warn!("Skipping {}: {e}", row.mutation_id);
                summary.count_failure(&e);
            }
        };
    }
    summary.exported = exported.len();
    Ok((exported, summary))
}

/// Full export: loads the TSV, converts every row, and writes the VCF.
/// # Arguments
/// * `input_fn` - the internal-notation TSV
/// * `source` - where the reference comes from
/// * `output_fn` - the VCF to write
/// * `threads` - number of worker threads
/// * `options` - header values for the VCF
/// # Errors
/// * if the input cannot be loaded or the output cannot be written
pub fn run_export(
    input_fn: &Path, source: ReferenceSource, output_fn: &Path, threads: usize, options: &CodecOptions
) -> Result<ExportSummary, Box<dyn std::error::Error>> {
    info!("Loading internal records from {input_fn:?}...");
    let rows = load_internal_rows(input_fn)?;
    info!("Converting {} records with {threads} threads...", rows.len());

    let (exported, summary) = export_rows(&rows, source, threads)?;

    info!("Writing {} records to {output_fn:?}...", exported.len());
    write_exchange_vcf(&exported, output_fn, options)?;
    Ok(summary)
}
