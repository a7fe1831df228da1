
/// Contains all the CLI related functionality
pub mod cli;
/// Contains the conversions between the internal and exchange notations, and the annotation parsing
pub mod codec;
/// Contains any specialized data types that are shared across the tooling
pub mod data_types;
/// Contains the driver for exporting internal mutations to VCF
pub mod exporter;
/// Contains the driver for importing VCF annotations as consequences
pub mod importer;
/// Contains the driver for summarizing functional impact predictions
pub mod impact_summary;
/// Contains the reference lookups used for anchoring
pub mod reference;
/// Contains generic utilities that are handy wrappers
pub mod util;
