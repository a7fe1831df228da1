
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Notifications attached to an annotation entry, either reported by the annotator or raised while parsing it
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ParseNotification {
    ErrorChromosomeNotFound,
    ErrorOutOfChromosomeRange,
    ErrorMissingCdsSequence,
    WarningReferenceDoesNotMatchGenome,
    WarningSequenceNotAvailable,
    WarningTranscriptIncomplete,
    WarningTranscriptMultipleStopCodons,
    WarningTranscriptNoStartCodon,
    /// The CDS mutation could not be derived from the codon change
    CdsMutationFailure,
    /// Anything the annotator reports that is not listed above
    #[strum(default)]
    Other(String)
}

impl ParseNotification {
    /// Parses an annotator code, keeping unrecognized codes as `Other`
    pub fn from_code(code: &str) -> ParseNotification {
        ParseNotification::from_str(code).unwrap_or_else(|_e| ParseNotification::Other(code.to_string()))
    }

    /// The code as written in output files
    pub fn code(&self) -> String {
        match self {
            ParseNotification::Other(code) => code.clone(),
            known => known.to_string()
        }
    }
}

impl From<String> for ParseNotification {
    fn from(code: String) -> Self {
        ParseNotification::from_code(&code)
    }
}

impl From<ParseNotification> for String {
    fn from(notification: ParseNotification) -> Self {
        notification.code()
    }
}

/// Collects the notifications raised for one annotation entry, in order
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ParseState {
    /// the notification codes
    error_codes: Vec<ParseNotification>,
    /// free-text messages, not necessarily one per code
    error_messages: Vec<String>
}

impl ParseState {
    pub fn add_error_code(&mut self, code: ParseNotification) {
        self.error_codes.push(code);
    }

    pub fn add_error_message(&mut self, message: impl Into<String>) {
        self.error_messages.push(message.into());
    }

    pub fn add_error_and_message(&mut self, code: ParseNotification, message: impl Into<String>) {
        self.add_error_code(code);
        self.add_error_message(message);
    }

    /// True if any code was recorded
    pub fn has_error(&self) -> bool {
        !self.error_codes.is_empty()
    }

    /// True if any of the provided codes was recorded
    pub fn contains_any_error(&self, codes: &[ParseNotification]) -> bool {
        self.error_codes.iter().any(|c| codes.contains(c))
    }

    pub fn error_codes(&self) -> &[ParseNotification] {
        &self.error_codes
    }

    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    /// Compact form for the output note column, e.g. `WARNING_TRANSCRIPT_INCOMPLETE;CDS_MUTATION_FAILURE`
    pub fn note(&self) -> String {
        self.error_codes.iter()
            .map(|c| c.code())
            .collect::<Vec<String>>()
            .join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let state = ParseState::default();
        assert!(state.error_codes().is_empty());
        assert!(state.error_messages().is_empty());
        assert!(!state.has_error());
        assert_eq!(state.note(), "");
    }

    #[test]
    fn test_add_error_and_message() {
        let mut state = ParseState::default();
        state.add_error_and_message(ParseNotification::ErrorChromosomeNotFound, "error message");
        assert!(state.has_error());
        assert_eq!(state.error_codes(), &[ParseNotification::ErrorChromosomeNotFound]);
        assert_eq!(state.error_messages(), &["error message".to_string()]);
    }

    #[test]
    fn test_contains_any_error() {
        let mut state = ParseState::default();
        state.add_error_and_message(ParseNotification::ErrorChromosomeNotFound, "error message");
        assert!(state.contains_any_error(&[ParseNotification::ErrorChromosomeNotFound]));
        assert!(!state.contains_any_error(&[ParseNotification::ErrorMissingCdsSequence]));

        state.add_error_and_message(ParseNotification::ErrorMissingCdsSequence, "error message 2");
        assert!(state.contains_any_error(&[ParseNotification::ErrorMissingCdsSequence]));
        assert!(!state.contains_any_error(&[ParseNotification::CdsMutationFailure, ParseNotification::ErrorOutOfChromosomeRange]));
        assert_eq!(state.note(), "ERROR_CHROMOSOME_NOT_FOUND;ERROR_MISSING_CDS_SEQUENCE");
    }

    #[test]
    fn test_codes() {
        assert_eq!(ParseNotification::from_code("WARNING_TRANSCRIPT_INCOMPLETE"), ParseNotification::WarningTranscriptIncomplete);
        assert_eq!(ParseNotification::from_code("WARNING_SOMETHING_NEW"), ParseNotification::Other("WARNING_SOMETHING_NEW".to_string()));
        assert_eq!(ParseNotification::CdsMutationFailure.code(), "CDS_MUTATION_FAILURE");
        assert_eq!(ParseNotification::Other("X".to_string()).code(), "X");
    }

    #[test]
    fn test_serde_codes() {
        let codes: Vec<ParseNotification> = serde_json::from_str(r#"["WARNING_TRANSCRIPT_INCOMPLETE", "WARNING_SOMETHING_NEW"]"#).unwrap();
        assert_eq!(codes, vec![
            ParseNotification::WarningTranscriptIncomplete,
            ParseNotification::Other("WARNING_SOMETHING_NEW".to_string())
        ]);
        assert_eq!(serde_json::to_string(&codes).unwrap(), r#"["WARNING_TRANSCRIPT_INCOMPLETE","WARNING_SOMETHING_NEW"]"#);
    }
}
