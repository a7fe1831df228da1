
use log::{info, warn};
use serde::Serialize;
use simple_error::bail;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::codec::impact_classifier::{classify_calls, ImpactTable};
use crate::data_types::impact::{CompositeImpactCategory, PredictionCall};

pub const OBSERVATION_ID_COLUMN: &str = "observation_id";
pub const CONSEQUENCE_TYPE_COLUMN: &str = "consequence_type";
pub const PREDICTION_COLUMN: &str = "functional_impact_prediction";
pub const SUMMARY_COLUMN: &str = "functional_impact_prediction_summary";

/// Results of one impact summary pass
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ImpactSummary {
    /// consequence rows read
    pub total_rows: usize,
    /// rows whose prediction column was not a valid list of calls
    pub invalid_predictions: usize,
    /// how many rows landed in each category
    pub category_counts: BTreeMap<CompositeImpactCategory, usize>,
    /// the distinct categories seen for each observation
    pub observation_summaries: BTreeMap<String, BTreeSet<CompositeImpactCategory>>
}

impl ImpactSummary {
    fn add(&mut self, observation_id: &str, category: CompositeImpactCategory) {
        self.total_rows += 1;
        *self.category_counts.entry(category).or_insert(0) += 1;
        self.observation_summaries.entry(observation_id.to_string())
            .or_default()
            .insert(category);
    }
}

/// Summarizes one consequence row.
/// Rows without a consequence type have no consequence to score and are `Unknown`.
/// # Arguments
/// * `table` - the impact lookup tables
/// * `consequence_type` - the row's consequence type
/// * `predictions` - JSON list of `{algorithm, prediction}` objects, blank for none
/// # Errors
/// * if `predictions` is not blank and does not parse
pub fn summarize_row(table: &ImpactTable, consequence_type: &str, predictions: &str) -> Result<CompositeImpactCategory, serde_json::Error> {
    if consequence_type.trim().is_empty() {
        return Ok(CompositeImpactCategory::Unknown);
    }
    let calls: Vec<PredictionCall> = if predictions.trim().is_empty() {
        vec![]
    } else {
        serde_json::from_str(predictions)?
    };
    Ok(classify_calls(table, consequence_type.trim(), &calls))
}

/// Reads a consequence TSV, appends the summary column, and writes the result.
/// All input columns are kept as-is.
/// # Arguments
/// * `input_fn` - TSV with at least the observation, consequence type, and prediction columns
/// * `output_fn` - where to write the annotated TSV
/// * `table` - the impact lookup tables
/// # Errors
/// * if a required column is missing
/// * if either file cannot be read or written
pub fn run_impact_summary(input_fn: &Path, output_fn: &Path, table: &ImpactTable) -> Result<ImpactSummary, Box<dyn std::error::Error>> {
    info!("Loading consequences from {input_fn:?}...");
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(input_fn)?;
    let headers = csv_reader.headers()?.clone();

    let column_index = |name: &str| -> Result<usize, Box<dyn std::error::Error>> {
        match headers.iter().position(|h| h == name) {
            Some(i) => Ok(i),
            None => bail!("Missing required column {name:?} in {input_fn:?}")
        }
    };
    let observation_index = column_index(OBSERVATION_ID_COLUMN)?;
    let consequence_index = column_index(CONSEQUENCE_TYPE_COLUMN)?;
    let prediction_index = column_index(PREDICTION_COLUMN)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(output_fn)?;
    let mut out_headers = headers.clone();
    out_headers.push_field(SUMMARY_COLUMN);
    csv_writer.write_record(&out_headers)?;

    let mut summary = ImpactSummary::default();
    for result in csv_reader.records() {
        let mut row = result?;
        let observation_id = row.get(observation_index).unwrap_or_default().to_string();
        let consequence_type = row.get(consequence_index).unwrap_or_default();
        let predictions = row.get(prediction_index).unwrap_or_default();

        let category = match summarize_row(table, consequence_type, predictions) {
            Ok(c) => c,
            Err(e) => {
                warn!("Ignoring unparseable predictions for {observation_id}: {e}");
                summary.invalid_predictions += 1;
                summarize_row(table, consequence_type, "")?
            }
        };
        summary.add(&observation_id, category);

        row.push_field(&category.to_string());
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;

    info!("Summarized {} consequences across {} observations", summary.total_rows, summary.observation_summaries.len());
    for (category, count) in summary.category_counts.iter() {
        info!("\t{category}: {count}");
    }
    Ok(summary)
}
