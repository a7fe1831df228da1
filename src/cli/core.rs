
use clap::{Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use log::error;
use std::path::Path;

use crate::cli::export::ExportSettings;
use crate::cli::impact::ImpactSettings;
use crate::cli::import::ImportSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.11.0-6bb9635-dirty` - while on a dirty branch
    /// * `0.11.0-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Shared after help string with the coordinate conventions and the notice.
    pub static ref AFTER_HELP: String = format!("Internal coordinates are 1-based and inclusive; VCF positions are left-anchored.
Copyright (C) 2013-{}     mutcodec contributors.
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year());
}

#[derive(Parser)]
#[clap(author, 
    version = &**FULL_VERSION, 
    about, 
    after_help = &**AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// mutcodec, a tool for converting somatic mutations between the internal and VCF notations.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Convert internal-notation mutations into a left-anchored VCF
    Export(Box<ExportSettings>),
    /// Explode the annotations of a VCF into consequence rows
    Import(Box<ImportSettings>),
    /// Append the composite functional impact to consequence rows
    Impact(Box<ImpactSettings>),
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Exits with `NOINPUT` if a required input file is missing
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - describes the file in the error message
pub fn check_required_filename(filename: &Path, label: &str) {
    if !filename.exists() {
        error!("{label} does not exist: {filename:?}");
        std::process::exit(exitcode::NOINPUT);
    }
}

/// Same as `check_required_filename`, but only if a path was provided
pub fn check_optional_filename(opt_filename: Option<&Path>, label: &str) {
    if let Some(filename) = opt_filename {
        check_required_filename(filename, label);
    }
}
