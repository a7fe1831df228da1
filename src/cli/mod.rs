
/// the main CLI module
pub mod core;
/// the export CLI subcommand for writing internal mutations as VCF
pub mod export;
/// the import CLI subcommand for exploding VCF annotations into consequences
pub mod import;
/// the impact CLI subcommand for summarizing functional impact predictions
pub mod impact;
