
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The functional impact predictors we know how to read
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PredictorType {
    Fathmm,
    MutationAssessor
}

/// Calls made by FATHMM
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FathmmImpactCategory {
    Damaging,
    Tolerated
}

/// Calls made by MutationAssessor
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationAssessorImpactCategory {
    High,
    Medium,
    Low,
    Neutral
}

/// A predictor call, typed by the predictor that made it
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum PredictorCategory {
    Fathmm(FathmmImpactCategory),
    MutationAssessor(MutationAssessorImpactCategory)
}

impl PredictorCategory {
    /// Parses a raw call for the given predictor
    /// # Errors
    /// * if the call is not one the predictor emits
    pub fn parse(predictor: PredictorType, call: &str) -> Result<PredictorCategory, strum::ParseError> {
        let call = call.trim().to_ascii_uppercase();
        Ok(match predictor {
            PredictorType::Fathmm => PredictorCategory::Fathmm(FathmmImpactCategory::from_str(&call)?),
            PredictorType::MutationAssessor => PredictorCategory::MutationAssessor(MutationAssessorImpactCategory::from_str(&call)?)
        })
    }
}

/// One predictor's call on one consequence
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ImpactPrediction {
    /// the call, which also identifies the predictor
    category: PredictorCategory
}

impl ImpactPrediction {
    pub fn new(category: PredictorCategory) -> ImpactPrediction {
        ImpactPrediction { category }
    }

    /// Resolves a raw (algorithm, prediction) pair, returning None when either side is unrecognized
    pub fn from_raw(algorithm: &str, prediction: &str) -> Option<ImpactPrediction> {
        let predictor = PredictorType::from_str(algorithm.trim()).ok()?;
        let category = PredictorCategory::parse(predictor, prediction).ok()?;
        Some(ImpactPrediction { category })
    }

    pub fn category(&self) -> PredictorCategory {
        self.category
    }
}

/// Raw predictor call as stored in consequence rows, e.g. `{"algorithm": "fathmm", "prediction": "TOLERATED"}`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PredictionCall {
    pub algorithm: String,
    pub prediction: String
}

/// Summary impact of a consequence, ordered by severity
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositeImpactCategory {
    #[default]
    Unknown,
    Low,
    Medium,
    High
}
