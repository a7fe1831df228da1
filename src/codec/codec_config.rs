
use serde::{Deserialize, Serialize};

use crate::data_types::codec_const::{DEFAULT_ANNOTATION_TAG, DEFAULT_GENE_BUILD_VERSION, DEFAULT_REFERENCE_NAME};
use crate::data_types::parse_state::ParseNotification;

/// Options for converting between notations, optionally loaded from JSON
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct CodecOptions {
    /// INFO tag holding the annotation field on import
    pub annotation_tag: String,
    /// Gene build version stamped on every consequence
    pub gene_build_version: String,
    /// Annotation entries carrying any of these notifications are dropped
    pub skipped_notifications: Vec<ParseNotification>,
    /// Written to the `##reference` header on export
    pub reference_name: String,
    /// Written to the `##source` header on export
    pub source_name: String
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            annotation_tag: DEFAULT_ANNOTATION_TAG.to_string(),
            gene_build_version: DEFAULT_GENE_BUILD_VERSION.to_string(),
            skipped_notifications: vec![],
            reference_name: DEFAULT_REFERENCE_NAME.to_string(),
            source_name: env!("CARGO_PKG_NAME").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let options: CodecOptions = serde_json::from_str(r#"{
            "gene_build_version": "79",
            "skipped_notifications": ["WARNING_TRANSCRIPT_INCOMPLETE", "ERROR_CHROMOSOME_NOT_FOUND"]
        }"#).unwrap();
        assert_eq!(options.annotation_tag, "EFF");
        assert_eq!(options.gene_build_version, "79");
        assert_eq!(options.skipped_notifications, vec![
            ParseNotification::WarningTranscriptIncomplete,
            ParseNotification::ErrorChromosomeNotFound
        ]);
        assert_eq!(options.reference_name, DEFAULT_REFERENCE_NAME);
    }

    #[test]
    fn test_unknown_notification() {
        let options: CodecOptions = serde_json::from_str(r#"{
            "skipped_notifications": ["WARNING_SOMETHING_NEW", "WARNING_TRANSCRIPT_NO_START_CODON"]
        }"#).unwrap();
        assert_eq!(options.skipped_notifications, vec![
            ParseNotification::Other("WARNING_SOMETHING_NEW".to_string()),
            ParseNotification::WarningTranscriptNoStartCodon
        ]);
    }

    #[test]
    fn test_default() {
        let options = CodecOptions::default();
        assert_eq!(options.annotation_tag, "EFF");
        assert_eq!(options.gene_build_version, "75");
        assert!(options.skipped_notifications.is_empty());
    }
}
