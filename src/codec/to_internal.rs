
use log::{trace, warn};

use crate::codec::codec_config::CodecOptions;
use crate::codec::errors::{AnnotationEntryParseError, CodecError};
use crate::codec::snpeff_parser::parse_annotation;
use crate::data_types::consequence::{ConsequenceRecord, Observation, TargetFileKind};
use crate::data_types::exchange_record::ExchangeRecord;

/// Everything that came out of exploding one record's annotation field
#[derive(Debug, Default)]
pub struct ConsequenceExplosion {
    /// one record per parsed entry that was not skipped
    records: Vec<ConsequenceRecord>,
    /// entries that could not be parsed
    errors: Vec<AnnotationEntryParseError>,
    /// set when the record itself could not be mapped into internal coordinates
    observation_error: Option<CodecError>,
    /// entries dropped because of a skipped notification
    skipped: usize
}

impl ConsequenceExplosion {
    pub fn records(&self) -> &[ConsequenceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ConsequenceRecord> {
        self.records
    }

    pub fn errors(&self) -> &[AnnotationEntryParseError] {
        &self.errors
    }

    pub fn observation_error(&self) -> Option<&CodecError> {
        self.observation_error.as_ref()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// True if nothing was produced and nothing went wrong
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.errors.is_empty() && self.observation_error.is_none() && self.skipped == 0
    }
}

/// Explodes the annotation field of an exchange record into one consequence record per entry.
/// Missing or blank annotations produce an empty explosion.
/// Malformed entries are logged and collected, the remaining entries are still converted.
/// # Arguments
/// * `record` - the exchange record, its first ALT allele defines the observation
/// * `kind` - the output layout the consequences are tagged with
/// * `options` - supplies the gene build version and the notifications that cause an entry to be skipped
pub fn explode_annotations(record: &ExchangeRecord, kind: TargetFileKind, options: &CodecOptions) -> ConsequenceExplosion {
    let mut explosion = ConsequenceExplosion::default();
    let annotation = match record.annotation() {
        Some(a) if !a.trim().is_empty() => a,
        _ => return explosion
    };

    let observation = match record.first_mutation().and_then(|m| m.to_internal()) {
        Ok((range, notation)) => Observation::new(record.id().to_string(), range, notation),
        Err(e) => {
            warn!("Skipping annotations for {}:{}: {e}", record.chrom(), record.position());
            explosion.observation_error = Some(e);
            return explosion;
        }
    };

    for parsed in parse_annotation(annotation) {
        match parsed {
            Ok(effect) => {
                if effect.parse_state.contains_any_error(&options.skipped_notifications) {
                    trace!("Skipping {} entry for {} with notifications {:?}", effect.consequence_type, record.id(), effect.parse_state.note());
                    explosion.skipped += 1;
                    continue;
                }
                explosion.records.push(ConsequenceRecord::new(
                    kind,
                    observation.clone(),
                    effect,
                    options.gene_build_version.clone()
                ));
            },
            Err(e) => {
                warn!("{}:{}: {e}", record.chrom(), record.position());
                explosion.errors.push(e);
            }
        };
    }
    explosion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::coordinates::GenomicRange;
    use crate::data_types::parse_state::ParseNotification;

    const MISSENSE: &str = "NON_SYNONYMOUS_CODING(MODERATE|MISSENSE|cgG/cgA|R626|1000|TP53|protein_coding|CODING|ENST00000269305|7|1)";
    const INCOMPLETE: &str = "UPSTREAM(MODIFIER||||211|ABC|protein_coding|CODING|ENST01||1||WARNING_TRANSCRIPT_INCOMPLETE)";

    fn create_record(reference: &str, alternate: &str, annotation: Option<&str>) -> ExchangeRecord {
        ExchangeRecord::new(
            "MU1".to_string(), "17".to_string(), 7577120,
            reference.to_string(), vec![alternate.to_string()],
            annotation.map(|a| a.to_string())
        )
    }

    #[test]
    fn test_empty_annotation() {
        let options = CodecOptions::default();
        for annotation in [None, Some(""), Some("  ")] {
            let explosion = explode_annotations(&create_record("C", "T", annotation), TargetFileKind::SmallMutation, &options);
            assert!(explosion.is_empty());
            assert!(explosion.records().is_empty());
        }

        // blank annotations never error, even when the alleles would
        let explosion = explode_annotations(&create_record("C", "C", None), TargetFileKind::SmallMutation, &options);
        assert!(explosion.is_empty());
    }

    #[test]
    fn test_explode() {
        let options = CodecOptions::default();
        let annotation = format!("{MISSENSE},{INCOMPLETE}");
        let record = create_record("C", "T", Some(&annotation));
        let explosion = explode_annotations(&record, TargetFileKind::SmallMutation, &options);
        assert_eq!(explosion.records().len(), 2);
        assert!(explosion.errors().is_empty());
        assert_eq!(explosion.skipped(), 0);

        let first = &explosion.records()[0];
        assert_eq!(first.target_file_kind(), TargetFileKind::SmallMutation);
        assert_eq!(first.observation().range(), &GenomicRange::new("17".to_string(), 7577120, 7577120));
        assert_eq!(first.observation().notation().to_string(), "C>T");
        assert_eq!(first.transcript_id(), "ENST00000269305");
        assert_eq!(first.gene_id(), "TP53");
        assert_eq!(first.consequence_type(), "NON_SYNONYMOUS_CODING");
        assert_eq!(first.amino_acid_change(), Some("R626R"));
        assert_eq!(first.cds_position(), Some(1878));
        assert_eq!(first.protein_position(), Some(626));
        assert_eq!(first.gene_build_version(), "75");
        assert_eq!(explosion.records()[1].consequence_type(), "UPSTREAM");
    }

    #[test]
    fn test_malformed_entries_are_recovered() {
        let options = CodecOptions::default();
        let annotation = format!("Abc,{MISSENSE},name()");
        let record = create_record("C", "T", Some(&annotation));
        let explosion = explode_annotations(&record, TargetFileKind::SimpleVariant, &options);
        assert_eq!(explosion.records().len(), 1);
        assert_eq!(explosion.errors().len(), 2);
        assert_eq!(explosion.errors()[0].entry, "Abc");
        assert_eq!(explosion.records()[0].target_file_kind(), TargetFileKind::SimpleVariant);
    }

    #[test]
    fn test_skipped_notifications() {
        let options = CodecOptions {
            skipped_notifications: vec![ParseNotification::WarningTranscriptIncomplete],
            ..Default::default()
        };
        let annotation = format!("{MISSENSE},{INCOMPLETE}");
        let record = create_record("C", "T", Some(&annotation));
        let explosion = explode_annotations(&record, TargetFileKind::SmallMutation, &options);
        assert_eq!(explosion.records().len(), 1);
        assert_eq!(explosion.skipped(), 1);
        assert_eq!(explosion.records()[0].transcript_id(), "ENST00000269305");
    }

    #[test]
    fn test_indel_observation() {
        let options = CodecOptions::default();
        let record = create_record("CTTG", "C", Some(MISSENSE));
        let explosion = explode_annotations(&record, TargetFileKind::SimpleVariant, &options);
        let observation = explosion.records()[0].observation();
        assert_eq!(observation.range(), &GenomicRange::new("17".to_string(), 7577121, 7577123));
        assert_eq!(observation.reference_allele(), "TTG");
        assert_eq!(observation.variant_allele(), "-");
    }

    #[test]
    fn test_unsupported_alleles() {
        let options = CodecOptions::default();
        let record = create_record("CTT", "GA", Some(MISSENSE));
        let explosion = explode_annotations(&record, TargetFileKind::SmallMutation, &options);
        assert!(explosion.records().is_empty());
        assert!(matches!(explosion.observation_error(), Some(CodecError::UnsupportedAlleles { .. })));
    }
}
