
use clap::Args;
use log::info;
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_required_filename};

#[derive(Args, Clone, Default)]
#[clap(author, about,
    after_help = &**AFTER_HELP)]
pub struct ImpactSettings {
    /// Input consequence file with predictor calls (TSV)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_filename: PathBuf,

    /// Output consequence file with the summary column appended (TSV)
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Optional output of the categories seen per observation (JSON)
    #[clap(long = "output-observations")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub observation_filename: Option<PathBuf>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_impact_settings(settings: ImpactSettings) -> Result<ImpactSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");
    check_required_filename(&settings.input_filename, "Consequence TSV");
    info!("\tConsequences: {:?}", settings.input_filename);

    info!("Outputs:");
    if settings.output_filename == settings.input_filename {
        bail!("--output must be different from --input");
    }
    info!("\tSummary TSV: {:?}", settings.output_filename);
    if let Some(filename) = settings.observation_filename.as_ref() {
        info!("\tObservation summary: {filename:?}");
    }

    Ok(settings)
}
