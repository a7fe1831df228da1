
use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::path::Path;

use crate::data_types::coordinates::GenomicRange;
use crate::data_types::mutation_notation::{MutationNotation, MISSING_ALLELE};
use crate::data_types::parse_state::ParseState;

/// The output file a consequence record is projected into
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumString)]
pub enum TargetFileKind {
    /// simple somatic mutations
    #[default]
    #[strum(serialize = "ssm")]
    SmallMutation,
    /// simple germline variants
    #[strum(serialize = "sgv")]
    SimpleVariant
}

/// Columns shared by both layouts, after the observation columns
const CONSEQUENCE_HEADERS: [&str; 14] = [
    "consequence_type", "additional_consequence_type", "aa_mutation", "cds_mutation",
    "protein_position", "cds_position", "gene_affected", "transcript_affected",
    "effect_impact", "functional_class", "gene_biotype", "exon_rank",
    "gene_build_version", "note"
];

impl TargetFileKind {
    /// Looks up a kind by its short name
    /// # Errors
    /// * if the name is not `ssm` or `sgv`
    pub fn by_name(name: &str) -> Result<TargetFileKind, SimpleError> {
        match name.parse() {
            Ok(kind) => Ok(kind),
            Err(_e) => bail!("Unknown target file kind: {name:?}")
        }
    }

    /// Looks up a kind from its primary or secondary file path, e.g. `/tmp/ssm_p.txt` or `/tmp/sgv_s.txt`
    /// # Errors
    /// * if the file name does not match any known file
    pub fn by_path(path: &Path) -> Result<TargetFileKind, SimpleError> {
        let file_name = path.file_name()
            .and_then(|f| f.to_str())
            .unwrap_or_default();
        for kind in [TargetFileKind::SmallMutation, TargetFileKind::SimpleVariant] {
            if file_name == kind.input_file_name() || file_name == kind.output_file_name() {
                return Ok(kind);
            }
        }
        bail!("No target file kind for path {path:?}");
    }

    /// The primary file this kind is read from
    pub fn input_file_name(&self) -> &'static str {
        match self {
            TargetFileKind::SmallMutation => "ssm_p.txt",
            TargetFileKind::SimpleVariant => "sgv_p.txt"
        }
    }

    /// The secondary file consequences are written to
    pub fn output_file_name(&self) -> &'static str {
        match self {
            TargetFileKind::SmallMutation => "ssm_s.txt",
            TargetFileKind::SimpleVariant => "sgv_s.txt"
        }
    }

    /// The column layout of the secondary file
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = vec!["observation_id", "chromosome", "chromosome_start", "chromosome_end"];
        match self {
            TargetFileKind::SmallMutation => headers.push("mutation"),
            TargetFileKind::SimpleVariant => headers.extend(["reference_genome_allele", "variant_allele"])
        };
        headers.extend(CONSEQUENCE_HEADERS);
        headers
    }
}

/// The observation a set of consequences belongs to, in internal coordinates
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Observation {
    /// the record identifier
    id: String,
    /// the affected span
    range: GenomicRange,
    /// the internal notation of the mutation
    notation: MutationNotation
}

impl Observation {
    pub fn new(id: String, range: GenomicRange, notation: MutationNotation) -> Observation {
        Observation { id, range, notation }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn range(&self) -> &GenomicRange {
        &self.range
    }

    pub fn notation(&self) -> &MutationNotation {
        &self.notation
    }

    /// The reference side, `-` for insertions
    pub fn reference_allele(&self) -> &str {
        missing_if_empty(self.notation.deleted())
    }

    /// The observed side, `-` for deletions
    pub fn variant_allele(&self) -> &str {
        missing_if_empty(self.notation.inserted())
    }
}

fn missing_if_empty(allele: &str) -> &str {
    if allele.is_empty() { MISSING_ALLELE } else { allele }
}

/// One parsed transcript effect from an annotation field
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EffectEntry {
    /// Sequence Ontology consequence term
    pub consequence_type: String,
    /// second term when the annotator combined two with `+`
    pub additional_consequence_type: Option<String>,
    /// annotator impact class, e.g. HIGH or MODIFIER
    pub effect_impact: String,
    /// e.g. MISSENSE or SILENT
    pub functional_class: String,
    /// codon change as reported, e.g. `cgG/cgA`
    pub codon_change: Option<String>,
    /// standardized amino acid change, e.g. `R626R`
    pub amino_acid_change: Option<String>,
    /// protein length
    pub amino_acid_length: Option<String>,
    /// gene name or identifier
    pub gene_id: String,
    /// transcript biotype
    pub gene_biotype: String,
    /// CODING or NON_CODING
    pub coding: String,
    /// transcript identifier
    pub transcript_id: String,
    /// exon rank
    pub exon_rank: Option<String>,
    /// CDS mutation derived from the codon change, e.g. `1878G>A`
    pub cds_mutation: Option<String>,
    /// 1-based CDS position of the first changed base
    pub cds_position: Option<u64>,
    /// 1-based amino acid position
    pub protein_position: Option<u64>,
    /// notifications raised for this entry
    pub parse_state: ParseState
}

/// A single (transcript, effect) consequence attached to an observation, tagged with the file it belongs to
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ConsequenceRecord {
    /// which output layout this record populates
    target_file_kind: TargetFileKind,
    /// the enclosing observation
    observation: Observation,
    /// the parsed effect
    effect: EffectEntry,
    /// annotation database version, e.g. the Ensembl release
    gene_build_version: String
}

impl ConsequenceRecord {
    pub fn new(target_file_kind: TargetFileKind, observation: Observation, effect: EffectEntry, gene_build_version: String) -> ConsequenceRecord {
        ConsequenceRecord {
            target_file_kind,
            observation,
            effect,
            gene_build_version
        }
    }

    /// Projects the record into the row layout of its target file, see `TargetFileKind::headers`
    pub fn to_row(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let opt_num = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_default();

        let range = self.observation.range();
        let mut row: Vec<String> = vec![
            self.observation.id().to_string(),
            range.chrom().to_string(),
            range.start().to_string(),
            range.end().to_string()
        ];
        match self.target_file_kind {
            TargetFileKind::SmallMutation => {
                row.push(self.observation.notation().to_string());
            },
            TargetFileKind::SimpleVariant => {
                row.push(self.observation.reference_allele().to_string());
                row.push(self.observation.variant_allele().to_string());
            }
        };

        let effect = &self.effect;
        row.extend([
            effect.consequence_type.clone(),
            opt(&effect.additional_consequence_type),
            opt(&effect.amino_acid_change),
            opt(&effect.cds_mutation),
            opt_num(effect.protein_position),
            opt_num(effect.cds_position),
            effect.gene_id.clone(),
            effect.transcript_id.clone(),
            effect.effect_impact.clone(),
            effect.functional_class.clone(),
            effect.gene_biotype.clone(),
            opt(&effect.exon_rank),
            self.gene_build_version.clone(),
            effect.parse_state.note()
        ]);
        row
    }

    pub fn target_file_kind(&self) -> TargetFileKind {
        self.target_file_kind
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn effect(&self) -> &EffectEntry {
        &self.effect
    }

    pub fn transcript_id(&self) -> &str {
        &self.effect.transcript_id
    }

    pub fn gene_id(&self) -> &str {
        &self.effect.gene_id
    }

    pub fn consequence_type(&self) -> &str {
        &self.effect.consequence_type
    }

    pub fn amino_acid_change(&self) -> Option<&str> {
        self.effect.amino_acid_change.as_deref()
    }

    pub fn cds_position(&self) -> Option<u64> {
        self.effect.cds_position
    }

    pub fn protein_position(&self) -> Option<u64> {
        self.effect.protein_position
    }

    pub fn gene_build_version(&self) -> &str {
        &self.gene_build_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_record(kind: TargetFileKind, token: &str) -> ConsequenceRecord {
        let observation = Observation::new(
            "MU00001".to_string(),
            GenomicRange::new("1".to_string(), 100, 100),
            MutationNotation::parse(token).unwrap()
        );
        let effect = EffectEntry {
            consequence_type: "missense_variant".to_string(),
            effect_impact: "MODERATE".to_string(),
            gene_id: "TP53".to_string(),
            transcript_id: "ENST00000269305".to_string(),
            protein_position: Some(626),
            ..Default::default()
        };
        ConsequenceRecord::new(kind, observation, effect, "75".to_string())
    }

    #[test]
    fn test_by_name() {
        assert_eq!(TargetFileKind::by_name("ssm").unwrap(), TargetFileKind::SmallMutation);
        assert_eq!(TargetFileKind::by_name("sgv").unwrap(), TargetFileKind::SimpleVariant);
        assert!(TargetFileKind::by_name("fake").is_err());
    }

    #[test]
    fn test_by_path() {
        assert_eq!(TargetFileKind::by_path(&PathBuf::from("/tmp/ssm_p.txt")).unwrap(), TargetFileKind::SmallMutation);
        assert_eq!(TargetFileKind::by_path(&PathBuf::from("/tmp/sgv_p.txt")).unwrap(), TargetFileKind::SimpleVariant);
        assert_eq!(TargetFileKind::by_path(&PathBuf::from("out/sgv_s.txt")).unwrap(), TargetFileKind::SimpleVariant);
        assert!(TargetFileKind::by_path(&PathBuf::from("/tmp/fake.txt")).is_err());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(TargetFileKind::SmallMutation.input_file_name(), "ssm_p.txt");
        assert_eq!(TargetFileKind::SimpleVariant.input_file_name(), "sgv_p.txt");
        assert_eq!(TargetFileKind::SmallMutation.output_file_name(), "ssm_s.txt");
        assert_eq!(TargetFileKind::SimpleVariant.output_file_name(), "sgv_s.txt");
    }

    #[test]
    fn test_rows_match_headers() {
        for kind in [TargetFileKind::SmallMutation, TargetFileKind::SimpleVariant] {
            let record = create_record(kind, "C>T");
            assert_eq!(record.to_row().len(), kind.headers().len());
        }
    }

    #[test]
    fn test_row_layouts() {
        let ssm = create_record(TargetFileKind::SmallMutation, "->A").to_row();
        assert_eq!(&ssm[0..5], &["MU00001", "1", "100", "100", "->A"]);
        assert_eq!(ssm[5], "missense_variant");
        assert_eq!(ssm[9], "626");

        let sgv = create_record(TargetFileKind::SimpleVariant, "->A").to_row();
        assert_eq!(&sgv[0..6], &["MU00001", "1", "100", "100", "-", "A"]);
        assert_eq!(sgv[6], "missense_variant");
    }
}
