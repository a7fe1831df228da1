
use log::{debug, info, warn};
use rust_htslib::bcf;
use rust_htslib::bcf::Read;
use serde::Serialize;
use simple_error::bail;
use std::path::Path;

use crate::codec::codec_config::CodecOptions;
use crate::codec::to_internal::{explode_annotations, ConsequenceExplosion};
use crate::data_types::consequence::TargetFileKind;
use crate::data_types::exchange_record::ExchangeRecord;

/// Counts for one import run
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ImportSummary {
    /// VCF records read
    pub total_records: usize,
    /// records without any annotation
    pub unannotated_records: usize,
    /// records whose alleles could not be mapped to the internal notation
    pub unsupported_records: usize,
    /// consequence rows written
    pub consequences: usize,
    /// annotation entries that failed to parse
    pub malformed_entries: usize,
    /// annotation entries dropped because of a skipped notification
    pub skipped_entries: usize
}

impl ImportSummary {
    /// Folds one record's explosion into the counts
    pub fn add_explosion(&mut self, explosion: &ConsequenceExplosion) {
        self.total_records += 1;
        if explosion.is_empty() {
            self.unannotated_records += 1;
        }
        if explosion.observation_error().is_some() {
            self.unsupported_records += 1;
        }
        self.consequences += explosion.records().len();
        self.malformed_entries += explosion.errors().len();
        self.skipped_entries += explosion.skipped();
    }
}

/// Converts an htslib record into our own record type
/// # Arguments
/// * `record` - the VCF record
/// * `header` - the header the record belongs to
/// * `annotation_tag` - INFO tag to pull the annotation from, if the header defines it
/// # Errors
/// * if the record has no contig or any field is not valid UTF-8
pub fn read_exchange_record(record: &bcf::Record, header: &bcf::header::HeaderView, annotation_tag: Option<&str>) -> Result<ExchangeRecord, Box<dyn std::error::Error>> {
    let rid = match record.rid() {
        Some(rid) => rid,
        None => bail!("Record has no contig: {}", record.desc())
    };
    let chrom = std::str::from_utf8(header.rid2name(rid)?)?.to_string();
    let position = record.pos() as u64 + 1;

    let raw_id = String::from_utf8(record.id())?;
    let id = if raw_id.is_empty() || raw_id == "." {
        format!("{chrom}:{position}")
    } else {
        raw_id
    };

    let alleles = record.alleles();
    let reference = match alleles.first() {
        Some(r) => std::str::from_utf8(r)?.to_string(),
        None => bail!("Record has no alleles: {}", record.desc())
    };
    let mut alternates = Vec::with_capacity(alleles.len().saturating_sub(1));
    for alt in alleles.iter().skip(1) {
        alternates.push(std::str::from_utf8(alt)?.to_string());
    }

    let annotation = match annotation_tag {
        Some(tag) => {
            match record.info(tag.as_bytes()).string() {
                Ok(Some(values)) => {
                    // htslib may hand back the value already split on commas
                    let mut pieces = Vec::with_capacity(values.len());
                    for v in values.iter() {
                        pieces.push(std::str::from_utf8(v)?);
                    }
                    Some(pieces.join(","))
                },
                Ok(None) => None,
                Err(e) => bail!("Error while parsing INFO:{tag} tag: {} => {e}", record.desc())
            }
        },
        None => None
    };

    Ok(ExchangeRecord::new(id, chrom, position, reference, alternates, annotation))
}

/// Full import: reads every VCF record, explodes its annotations, and writes the consequence rows.
/// # Arguments
/// * `vcf_fn` - the annotated VCF
/// * `kind` - the output layout
/// * `output_fn` - the consequence TSV to write
/// * `options` - annotation tag, gene build version, and skipped notifications
/// # Errors
/// * if the VCF cannot be read or the output cannot be written
pub fn run_import(vcf_fn: &Path, kind: TargetFileKind, output_fn: &Path, options: &CodecOptions) -> Result<ImportSummary, Box<dyn std::error::Error>> {
    info!("Loading exchange records from {vcf_fn:?}...");
    let mut vcf_reader = bcf::Reader::from_path(vcf_fn)?;
    let header = vcf_reader.header().clone();

    let annotation_tag = if header.info_type(options.annotation_tag.as_bytes()).is_ok() {
        Some(options.annotation_tag.as_str())
    } else {
        warn!("INFO:{} is not defined in {vcf_fn:?}, no consequences will be generated", options.annotation_tag);
        None
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(output_fn)?;
    csv_writer.write_record(kind.headers())?;

    let mut summary = ImportSummary::default();
    for result in vcf_reader.records() {
        let record = result?;
        let exchange_record = read_exchange_record(&record, &header, annotation_tag)?;
        let explosion = explode_annotations(&exchange_record, kind, options);
        summary.add_explosion(&explosion);

        for consequence in explosion.records().iter() {
            csv_writer.write_record(consequence.to_row())?;
        }

        if summary.total_records % 100000 == 0 {
            debug!("Processed {} records, {} consequences", summary.total_records, summary.consequences);
        }
    }
    csv_writer.flush()?;

    info!("Wrote {} consequences to {output_fn:?}", summary.consequences);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MISSENSE: &str = "NON_SYNONYMOUS_CODING(MODERATE|MISSENSE|cgG/cgA|R626|1000|TP53|protein_coding|CODING|ENST00000269305|7|1)";
    const UPSTREAM: &str = "UPSTREAM(MODIFIER||||211|ABC|protein_coding|CODING|ENST01||1||WARNING_TRANSCRIPT_INCOMPLETE)";

    fn write_vcf(path: &Path) {
        let mut vcf = std::fs::File::create(path).unwrap();
        writeln!(vcf, "##fileformat=VCFv4.2").unwrap();
        writeln!(vcf, "##contig=<ID=17>").unwrap();
        writeln!(vcf, "##INFO=<ID=EFF,Number=.,Type=String,Description=\"Predicted effects\">").unwrap();
        writeln!(vcf, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO").unwrap();
        writeln!(vcf, "17\t7577120\tMU1\tC\tT\t.\t.\tEFF={MISSENSE},{UPSTREAM}").unwrap();
        writeln!(vcf, "17\t7577130\t.\tCTTG\tC\t.\t.\tEFF={MISSENSE},Abc").unwrap();
        writeln!(vcf, "17\t7577140\tMU3\tA\tG\t.\t.\t.").unwrap();
        writeln!(vcf, "17\t7577150\tMU4\tACG\tTT\t.\t.\tEFF={MISSENSE}").unwrap();
    }

    #[test]
    fn test_run_import() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = tmp_dir.path().join("in.vcf");
        write_vcf(&vcf_fn);

        let output_fn = tmp_dir.path().join("sgv_s.txt");
        let summary = run_import(&vcf_fn, TargetFileKind::SimpleVariant, &output_fn, &CodecOptions::default()).unwrap();
        assert_eq!(summary, ImportSummary {
            total_records: 4,
            unannotated_records: 1,
            unsupported_records: 1,
            consequences: 3,
            malformed_entries: 1,
            skipped_entries: 0
        });

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(&output_fn)
            .unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(|s| s.to_string()).collect();
        assert_eq!(headers, TargetFileKind::SimpleVariant.headers());
        let rows: Vec<Vec<String>> = reader.records()
            .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0..6], &["MU1", "17", "7577120", "7577120", "C", "T"]);
        assert_eq!(rows[1][6], "UPSTREAM");
        assert_eq!(&rows[2][0..6], &["17:7577130", "17", "7577131", "7577133", "TTG", "-"]);
    }

    #[test]
    fn test_run_import_skipped() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = tmp_dir.path().join("in.vcf");
        write_vcf(&vcf_fn);

        let options: CodecOptions = serde_json::from_str(r#"{"skipped_notifications": ["WARNING_TRANSCRIPT_INCOMPLETE"]}"#).unwrap();
        let output_fn = tmp_dir.path().join("ssm_s.txt");
        let summary = run_import(&vcf_fn, TargetFileKind::SmallMutation, &output_fn, &options).unwrap();
        assert_eq!(summary.consequences, 2);
        assert_eq!(summary.skipped_entries, 1);
    }

    #[test]
    fn test_run_import_other_tag() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = tmp_dir.path().join("in.vcf");
        write_vcf(&vcf_fn);

        let options = CodecOptions {
            annotation_tag: "ANN".to_string(),
            ..Default::default()
        };
        let output_fn = tmp_dir.path().join("ssm_s.txt");
        let summary = run_import(&vcf_fn, TargetFileKind::SmallMutation, &output_fn, &options).unwrap();
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.unannotated_records, 4);
        assert_eq!(summary.consequences, 0);
    }
}
