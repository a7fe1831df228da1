
use log::{LevelFilter, error, info, warn};
use rust_lib_reference_genome::reference_genome::ReferenceGenome;
use std::path::Path;

use mutcodec::cli::core::{Commands, get_cli};
use mutcodec::cli::export::{ExportSettings, check_export_settings};
use mutcodec::cli::impact::{ImpactSettings, check_impact_settings};
use mutcodec::cli::import::{ImportSettings, check_import_settings};
use mutcodec::codec::codec_config::CodecOptions;
use mutcodec::codec::impact_classifier::DEFAULT_IMPACT_TABLE;
use mutcodec::exporter::{ExportSummary, ReferenceSource};
use mutcodec::importer::ImportSummary;
use mutcodec::impact_summary::ImpactSummary;
use mutcodec::util::file_io::{load_json, save_json};

/// Sets up the logger from the `-v` count
fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// Loads the codec options if provided, otherwise the defaults
fn load_codec_options(options_filename: Option<&Path>) -> CodecOptions {
    let options: CodecOptions = if let Some(filename) = options_filename {
        match load_json(filename) {
            Ok(o) => o,
            Err(e) => {
                error!("Error while loading codec options: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }
    } else {
        CodecOptions::default()
    };
    info!("Codec options: {options:#?}");
    options
}

/// This will run the "export" mode of the tool
/// # Arguments
/// * `settings` - the ExportSettings object
fn run_export(settings: ExportSettings) {
    init_logging(settings.verbosity);

    let cli_settings: ExportSettings = match check_export_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };
    let options = load_codec_options(cli_settings.options_filename.as_deref());

    // the in-memory reference has to outlive the source that borrows it
    let reference_genome: Option<ReferenceGenome> = if cli_settings.in_memory_reference {
        info!("Loading reference genome from {:?}...", cli_settings.reference_filename);
        match ReferenceGenome::from_fasta(&cli_settings.reference_filename) {
            Ok(rg) => Some(rg),
            Err(e) => {
                error!("Error while loading reference genome file: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }
    } else {
        None
    };
    let source = match reference_genome.as_ref() {
        Some(rg) => ReferenceSource::InMemory(rg),
        None => ReferenceSource::Indexed(&cli_settings.reference_filename)
    };

    let summary: ExportSummary = match mutcodec::exporter::run_export(
        &cli_settings.input_filename,
        source,
        &cli_settings.output_filename,
        cli_settings.threads,
        &options
    ) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while exporting mutations: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    info!("Export summary:");
    info!("\tTotal rows: {}", summary.total_rows);
    info!("\tExported: {}", summary.exported);
    if summary.failed() > 0 {
        warn!("\tSkipped: {} ({} invalid rows, {} invalid notation, {} reference unavailable, {} other)",
            summary.failed(), summary.invalid_rows, summary.invalid_notation,
            summary.reference_unavailable, summary.other_failures
        );
    }
}

/// This will run the "import" mode of the tool
/// # Arguments
/// * `settings` - the ImportSettings object
fn run_import(settings: ImportSettings) {
    init_logging(settings.verbosity);

    let cli_settings: ImportSettings = match check_import_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };
    let options = load_codec_options(cli_settings.options_filename.as_deref());

    let summary: ImportSummary = match mutcodec::importer::run_import(
        &cli_settings.vcf_filename,
        cli_settings.kind.unwrap_or_default(),
        &cli_settings.output_filename,
        &options
    ) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while importing annotations: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    info!("Import summary:");
    info!("\tRecords: {}", summary.total_records);
    info!("\tUnannotated records: {}", summary.unannotated_records);
    info!("\tConsequences: {}", summary.consequences);
    if summary.skipped_entries > 0 {
        info!("\tSkipped entries: {}", summary.skipped_entries);
    }
    if summary.unsupported_records > 0 {
        warn!("\tUnsupported records: {}", summary.unsupported_records);
    }
    if summary.malformed_entries > 0 {
        warn!("\tMalformed entries: {}", summary.malformed_entries);
    }
}

/// This will run the "impact" mode of the tool
/// # Arguments
/// * `settings` - the ImpactSettings object
fn run_impact(settings: ImpactSettings) {
    init_logging(settings.verbosity);

    let cli_settings: ImpactSettings = match check_impact_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    let summary: ImpactSummary = match mutcodec::impact_summary::run_impact_summary(
        &cli_settings.input_filename,
        &cli_settings.output_filename,
        &DEFAULT_IMPACT_TABLE
    ) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while summarizing impacts: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    if summary.invalid_predictions > 0 {
        warn!("{} rows had unparseable predictions", summary.invalid_predictions);
    }

    if let Some(filename) = cli_settings.observation_filename.as_ref() {
        info!("Saving observation summaries to {filename:?}");
        match save_json(&summary.observation_summaries, filename) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while writing observation summaries to file: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Export(settings) => {
            run_export(*settings);
        },
        Commands::Import(settings) => {
            run_import(*settings);
        },
        Commands::Impact(settings) => {
            run_impact(*settings);
        }
    }

    info!("Process finished successfully.");
}
