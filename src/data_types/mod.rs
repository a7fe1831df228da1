
/// Constants and lookup tables that are hard-coded
pub mod codec_const;
/// Consequence records and the output files they belong to
pub mod consequence;
/// Contains the coordinates functionality
pub mod coordinates;
/// A left-anchored REF/ALT variant
pub mod exchange_mutation;
/// A VCF row, decoupled from htslib
pub mod exchange_record;
/// Functional impact predictor calls and the composite category
pub mod impact;
/// The compact internal mutation token
pub mod mutation_notation;
/// Notifications collected while parsing annotation entries
pub mod parse_state;
