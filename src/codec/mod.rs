
/// Options shared by the conversions, loadable from JSON
pub mod codec_config;
/// Errors raised while converting single records
pub mod errors;
/// Combines predictor calls and consequence types into a composite impact
pub mod impact_classifier;
/// Parser for the snpEff `EFF` annotation field
pub mod snpeff_parser;
/// Internal notation => exchange (VCF) notation
pub mod to_exchange;
/// Exchange (VCF) records => per-transcript consequence records
pub mod to_internal;
/// Writes exchange records to VCF
pub mod vcf_writer;
