
use lazy_static::lazy_static;
use rustc_hash::FxHashSet as HashSet;
use std::collections::BTreeMap;

use crate::data_types::impact::{CompositeImpactCategory, FathmmImpactCategory, MutationAssessorImpactCategory, PredictorCategory};

/// INFO tag snpEff writes its effects to
pub const DEFAULT_ANNOTATION_TAG: &str = "EFF";
/// Ensembl release the annotation database was built from
pub const DEFAULT_GENE_BUILD_VERSION: &str = "75";
/// Reference label written to exported VCF headers when none is given
pub const DEFAULT_REFERENCE_NAME: &str = "GRCh37";

// consequence names we refer to directly
pub const EXON_LOSS: &str = "exon_loss";
pub const EXON_LOSS_VARIANT: &str = "exon_loss_variant";
pub const FRAMESHIFT_VARIANT: &str = "frameshift_variant";

lazy_static!{
    /// Consequence terms that snpEff 3.6 still emits under their legacy names
    pub static ref CONSEQUENCE_RENAMES: BTreeMap<&'static str, &'static str> = [
        (EXON_LOSS, EXON_LOSS_VARIANT)
    ].into_iter().collect();

    /// Consequences that are high impact regardless of what the predictors say
    pub static ref HIGH_IMPACT_CONSEQUENCES: HashSet<&'static str> = [
        EXON_LOSS_VARIANT,
        FRAMESHIFT_VARIANT,
        "rare_amino_acid_variant",
        "splice_acceptor_variant",
        "splice_donor_variant",
        "start_lost",
        "stop_gained",
        "stop_lost",
        "transcript_ablation"
    ].into_iter().collect();

    /// What each predictor call contributes to the composite impact
    pub static ref PREDICTOR_IMPACTS: BTreeMap<PredictorCategory, CompositeImpactCategory> = [
        (PredictorCategory::Fathmm(FathmmImpactCategory::Damaging), CompositeImpactCategory::High),
        (PredictorCategory::Fathmm(FathmmImpactCategory::Tolerated), CompositeImpactCategory::Low),
        (PredictorCategory::MutationAssessor(MutationAssessorImpactCategory::High), CompositeImpactCategory::High),
        (PredictorCategory::MutationAssessor(MutationAssessorImpactCategory::Medium), CompositeImpactCategory::Medium),
        (PredictorCategory::MutationAssessor(MutationAssessorImpactCategory::Low), CompositeImpactCategory::Low),
        (PredictorCategory::MutationAssessor(MutationAssessorImpactCategory::Neutral), CompositeImpactCategory::Low)
    ].into_iter().collect();
}
