
use itertools::Itertools;
use log::debug;
use rust_htslib::bcf;
use rust_htslib::bcf::header::Header;
use rust_htslib::bcf::Writer;
use std::path::Path;

use crate::codec::codec_config::CodecOptions;
use crate::data_types::exchange_mutation::ExchangeMutation;

/// INFO tag holding the canonical `REF>ALT` notation
pub const MUTATION_TAG: &str = "MUTATION";
/// INFO tag holding the internal token the record was converted from
pub const SOURCE_MUTATION_TAG: &str = "SOURCE_MUTATION";

/// A converted record, ready to be written
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportedRecord {
    /// goes in the ID column
    id: String,
    /// the exchange form
    mutation: ExchangeMutation,
    /// the internal token, e.g. `TTC>-`
    source_notation: String
}

impl ExportedRecord {
    pub fn new(id: String, mutation: ExchangeMutation, source_notation: String) -> ExportedRecord {
        ExportedRecord { id, mutation, source_notation }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mutation(&self) -> &ExchangeMutation {
        &self.mutation
    }

    pub fn source_notation(&self) -> &str {
        &self.source_notation
    }
}

/// Writes a sites-only VCF file containing the exchange records in the provided order.
/// One `##contig` line is written per chromosome, in order of first appearance.
/// # Arguments
/// * `records` - the records to write
/// * `vcf_fn` - the path to the VCF file to write
/// * `options` - provides the source and reference header values
/// # Errors
/// * if the VCF file cannot be written
/// * if a record cannot be encoded by htslib
pub fn write_exchange_vcf(records: &[ExportedRecord], vcf_fn: &Path, options: &CodecOptions) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Writing {} exchange records to {vcf_fn:?}...", records.len());

    let ver: &str = crate::cli::core::FULL_VERSION.as_str();
    let cli_string = format!("\"{}\"", std::env::args().collect::<Vec<String>>().join(" "));

    let mut header = Header::new();
    header.push_record(b"##fileformat=VCFv4.2");

    let date = chrono::Utc::now().format("%Y%m%d").to_string();
    header.push_record(format!("##fileDate={date}").as_bytes());
    header.push_record(format!("##source={}", options.source_name).as_bytes());
    header.push_record(format!("##reference={}", options.reference_name).as_bytes());

    // contigs in order of first appearance
    let contigs = records.iter()
        .map(|r| r.mutation().chrom())
        .unique();
    for chrom in contigs {
        header.push_record(format!("##contig=<ID={chrom}>").as_bytes());
    }

    header.push_record(format!("##INFO=<ID={MUTATION_TAG},Number=1,Type=String,Description=\"Canonical notation of the REF and ALT alleles\">").as_bytes());
    header.push_record(format!("##INFO=<ID={SOURCE_MUTATION_TAG},Number=1,Type=String,Description=\"Internal notation the record was converted from\">").as_bytes());
    header.push_record(format!("##mutcodec_version=\"{ver}\"").as_bytes());
    header.push_record(format!("##mutcodec_command={cli_string}").as_bytes());

    let uncompressed = vcf_fn.extension().unwrap_or_default() != "gz";
    let mut writer = Writer::from_path(vcf_fn, &header, uncompressed, bcf::Format::Vcf)?;
    for exported in records.iter() {
        let mutation = exported.mutation();
        let rid = writer.header().name2rid(mutation.chrom().as_bytes())?;

        let mut record = writer.empty_record();
        if !exported.id().is_empty() {
            record.set_id(exported.id().as_bytes())?;
        }
        record.set_rid(Some(rid));
        record.set_pos(mutation.position() as i64 - 1); // 0-based
        record.set_alleles(&[
            mutation.reference_allele().as_bytes(),
            mutation.alternate_allele().as_bytes()
        ])?;
        record.set_qual(bcf::record::Numeric::missing());
        record.push_info_string(MUTATION_TAG.as_bytes(), &[mutation.canonical_notation().as_bytes()])?;
        record.push_info_string(SOURCE_MUTATION_TAG.as_bytes(), &[exported.source_notation().as_bytes()])?;
        writer.write(&record)?;
    }

    Ok(())
}
