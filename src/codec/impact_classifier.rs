
use lazy_static::lazy_static;
use log::trace;
use rustc_hash::FxHashSet as HashSet;
use std::collections::BTreeMap;

use crate::codec::snpeff_parser::CONSEQUENCE_TERM_DELIMITER;
use crate::data_types::codec_const::{HIGH_IMPACT_CONSEQUENCES, PREDICTOR_IMPACTS};
use crate::data_types::impact::{CompositeImpactCategory, ImpactPrediction, PredictionCall, PredictorCategory};

lazy_static!{
    /// The default lookup tables, built once
    pub static ref DEFAULT_IMPACT_TABLE: ImpactTable = ImpactTable::default();
}

/// Immutable lookup tables driving the composite impact
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImpactTable {
    /// consequence types that are always high impact
    high_impact_consequences: HashSet<String>,
    /// what each predictor call maps to
    predictor_impacts: BTreeMap<PredictorCategory, CompositeImpactCategory>
}

impl Default for ImpactTable {
    fn default() -> Self {
        Self {
            high_impact_consequences: HIGH_IMPACT_CONSEQUENCES.iter().map(|c| c.to_string()).collect(),
            predictor_impacts: PREDICTOR_IMPACTS.clone()
        }
    }
}

impl ImpactTable {
    pub fn new(high_impact_consequences: HashSet<String>, predictor_impacts: BTreeMap<PredictorCategory, CompositeImpactCategory>) -> ImpactTable {
        ImpactTable {
            high_impact_consequences,
            predictor_impacts
        }
    }

    /// True if the consequence, or any of its combined terms, is always high impact
    pub fn is_high_impact(&self, consequence_type: &str) -> bool {
        consequence_type.split(CONSEQUENCE_TERM_DELIMITER)
            .any(|term| self.high_impact_consequences.contains(term.trim()))
    }

    /// The impact a single predictor call maps to, if the table knows it
    pub fn prediction_impact(&self, prediction: &ImpactPrediction) -> Option<CompositeImpactCategory> {
        self.predictor_impacts.get(&prediction.category()).copied()
    }
}

/// Combines a consequence type and the raw predictor calls into one composite impact.
/// High impact consequence types win outright, otherwise the most severe mapped call is used.
/// Unrecognized predictors or calls are ignored, and with nothing usable the result is `Unknown`.
/// # Arguments
/// * `table` - the lookup tables to use
/// * `consequence_type` - the consequence type, possibly two terms joined with `+`
/// * `predictions` - raw calls keyed by predictor name, e.g. `"fathmm" => "TOLERATED"`
pub fn classify(table: &ImpactTable, consequence_type: &str, predictions: &BTreeMap<String, String>) -> CompositeImpactCategory {
    if table.is_high_impact(consequence_type) {
        return CompositeImpactCategory::High;
    }

    predictions.iter()
        .filter_map(|(algorithm, call)| {
            let resolved = ImpactPrediction::from_raw(algorithm, call)
                .and_then(|p| table.prediction_impact(&p));
            if resolved.is_none() {
                trace!("Ignoring prediction {algorithm:?} => {call:?}");
            }
            resolved
        })
        .max()
        .unwrap_or(CompositeImpactCategory::Unknown)
}

/// Convenience wrapper for calls stored as a list of `{algorithm, prediction}` objects.
/// Later calls from the same predictor replace earlier ones.
pub fn classify_calls(table: &ImpactTable, consequence_type: &str, calls: &[PredictionCall]) -> CompositeImpactCategory {
    let predictions: BTreeMap<String, String> = calls.iter()
        .map(|c| (c.algorithm.clone(), c.prediction.clone()))
        .collect();
    classify(table, consequence_type, &predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter()
            .map(|(a, p)| (a.to_string(), p.to_string()))
            .collect()
    }

    #[test]
    fn test_missense_disagreement() {
        let result = classify(
            &DEFAULT_IMPACT_TABLE, "missense_variant",
            &predictions(&[("fathmm", "TOLERATED"), ("mutation_assessor", "HIGH")])
        );
        assert_eq!(result, CompositeImpactCategory::High);
    }

    #[test]
    fn test_single_predictor() {
        let table = &DEFAULT_IMPACT_TABLE;
        assert_eq!(classify(table, "missense_variant", &predictions(&[("fathmm", "DAMAGING")])), CompositeImpactCategory::High);
        assert_eq!(classify(table, "missense_variant", &predictions(&[("fathmm", "TOLERATED")])), CompositeImpactCategory::Low);
        assert_eq!(classify(table, "missense_variant", &predictions(&[("mutation_assessor", "MEDIUM")])), CompositeImpactCategory::Medium);
        assert_eq!(classify(table, "missense_variant", &predictions(&[("mutation_assessor", "NEUTRAL")])), CompositeImpactCategory::Low);
        assert_eq!(
            classify(table, "missense_variant", &predictions(&[("fathmm", "TOLERATED"), ("mutation_assessor", "MEDIUM")])),
            CompositeImpactCategory::Medium
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        let table = &DEFAULT_IMPACT_TABLE;
        assert_eq!(classify(table, "missense_variant", &BTreeMap::new()), CompositeImpactCategory::Unknown);
        assert_eq!(classify(table, "", &BTreeMap::new()), CompositeImpactCategory::Unknown);
        assert_eq!(
            classify(table, "missense_variant", &predictions(&[("sift", "DELETERIOUS"), ("fathmm", "MAYBE")])),
            CompositeImpactCategory::Unknown
        );
    }

    #[test]
    fn test_high_impact_consequence() {
        let table = &DEFAULT_IMPACT_TABLE;
        assert_eq!(classify(table, "stop_gained", &BTreeMap::new()), CompositeImpactCategory::High);
        assert_eq!(
            classify(table, "frameshift_variant", &predictions(&[("fathmm", "TOLERATED")])),
            CompositeImpactCategory::High
        );
        assert_eq!(classify(table, "5_prime_UTR_truncation+exon_loss_variant", &BTreeMap::new()), CompositeImpactCategory::High);
        assert_eq!(classify(table, "intron_variant+upstream_gene_variant", &BTreeMap::new()), CompositeImpactCategory::Unknown);
    }

    #[test]
    fn test_deterministic() {
        let table = &DEFAULT_IMPACT_TABLE;
        let preds = predictions(&[("mutation_assessor", "LOW"), ("fathmm", "DAMAGING")]);
        let first = classify(table, "missense_variant", &preds);
        for _ in 0..10 {
            assert_eq!(classify(table, "missense_variant", &preds), first);
        }
    }

    #[test]
    fn test_custom_table() {
        let table = ImpactTable::new(
            ["missense_variant".to_string()].into_iter().collect(),
            BTreeMap::new()
        );
        assert_eq!(classify(&table, "missense_variant", &BTreeMap::new()), CompositeImpactCategory::High);
        assert_eq!(
            classify(&table, "synonymous_variant", &predictions(&[("fathmm", "DAMAGING")])),
            CompositeImpactCategory::Unknown
        );
    }

    #[test]
    fn test_classify_calls() {
        let calls = vec![
            PredictionCall { algorithm: "fathmm".to_string(), prediction: "TOLERATED".to_string() },
            PredictionCall { algorithm: "mutation_assessor".to_string(), prediction: "HIGH".to_string() }
        ];
        assert_eq!(classify_calls(&DEFAULT_IMPACT_TABLE, "missense_variant", &calls), CompositeImpactCategory::High);
        assert_eq!(classify_calls(&DEFAULT_IMPACT_TABLE, "missense_variant", &[]), CompositeImpactCategory::Unknown);
    }
}
