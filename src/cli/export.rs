
use clap::Args;
use log::{info, warn};
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_optional_filename, check_required_filename};

#[derive(Args, Clone, Default)]
#[clap(author, about,
    after_help = &**AFTER_HELP)]
pub struct ExportSettings {
    /// Input mutation file in the internal notation (TSV)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_filename: PathBuf,

    /// Reference FASTA file, indexed automatically if no .fai is present
    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "reference")]
    #[clap(value_name = "FASTA")]
    #[clap(help_heading = Some("Input/Output"))]
    pub reference_filename: PathBuf,

    /// Output variant file in VCF format, compressed if it ends with .gz
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Optional codec options file (JSON)
    #[clap(long = "options")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub options_filename: Option<PathBuf>,

    /// Loads the full reference into memory instead of reading it through the index
    #[clap(long = "in-memory-reference")]
    #[clap(help_heading = Some("Conversion"))]
    pub in_memory_reference: bool,

    /// Number of threads to use for conversion.
    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_export_settings(mut settings: ExportSettings) -> Result<ExportSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");

    check_required_filename(&settings.input_filename, "Mutation TSV");
    check_required_filename(&settings.reference_filename, "Reference FASTA");
    check_optional_filename(settings.options_filename.as_deref(), "Options JSON");

    info!("\tMutations: {:?}", settings.input_filename);
    info!("\tReference: {:?}", settings.reference_filename);
    if let Some(ofn) = settings.options_filename.as_ref() {
        info!("\tOptions: {ofn:?}");
    }

    info!("Outputs:");
    if settings.output_filename == settings.input_filename {
        bail!("--output must be different from --input");
    }
    info!("\tVCF: {:?}", settings.output_filename);

    info!("Conversion settings:");
    info!("\tReference mode: {}", if settings.in_memory_reference { "IN-MEMORY" } else { "INDEXED" });
    if settings.threads == 0 {
        settings.threads = 1;
    }
    if settings.in_memory_reference && settings.threads > 1 {
        warn!("\tEvery thread shares one in-memory reference, memory use does not scale with --threads");
    }
    info!("\tThreads: {}", settings.threads);

    Ok(settings)
}
