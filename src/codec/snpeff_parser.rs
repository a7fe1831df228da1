
// snpEff 3.6 `EFF` entries look like:
//   EFFECT(IMPACT|FUNCTIONAL_CLASS|CODON_CHANGE|AA_CHANGE|AA_LENGTH|GENE_NAME|TRANSCRIPT_BIOTYPE|GENE_CODING|TRANSCRIPT_ID|EXON_RANK|GENOTYPE_NUMBER[|ERRORS[|WARNINGS]])
// and multiple entries are joined with `,`

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::codec::errors::AnnotationEntryParseError;
use crate::data_types::codec_const::{CONSEQUENCE_RENAMES, FRAMESHIFT_VARIANT};
use crate::data_types::consequence::EffectEntry;
use crate::data_types::mutation_notation::NOTATION_DELIMITER;
use crate::data_types::parse_state::{ParseNotification, ParseState};

pub const EFFECT_DELIMITER: char = ',';
pub const METADATA_OPEN: char = '(';
pub const METADATA_CLOSE: char = ')';
pub const METADATA_SUBFIELD_DELIMITER: char = '|';
/// joins combined consequence terms, e.g. `5_prime_UTR_truncation+exon_loss`
pub const CONSEQUENCE_TERM_DELIMITER: char = '+';
/// joins multiple codes inside the ERRORS or WARNINGS sub-field
pub const NOTIFICATION_DELIMITER: char = '&';

/// sub-fields through GENOTYPE_NUMBER are required
const MIN_SUBFIELDS: usize = 11;
/// ERRORS and WARNINGS are optional
const MAX_SUBFIELDS: usize = 13;
const MAX_CONSEQUENCE_TERMS: usize = 2;

// sub-field offsets
const IMPACT_FIELD: usize = 0;
const FUNCTIONAL_CLASS_FIELD: usize = 1;
const CODON_CHANGE_FIELD: usize = 2;
const AMINO_ACID_CHANGE_FIELD: usize = 3;
const AMINO_ACID_LENGTH_FIELD: usize = 4;
const GENE_NAME_FIELD: usize = 5;
const BIOTYPE_FIELD: usize = 6;
const CODING_FIELD: usize = 7;
const TRANSCRIPT_ID_FIELD: usize = 8;
const EXON_RANK_FIELD: usize = 9;

lazy_static!{
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
    static ref SHORT_AMINO_ACID_CHANGE: Regex = Regex::new(r"^[A-Z*][0-9]+$").unwrap();
}

/// Splits the full annotation value into its entries and parses each one independently.
/// A blank annotation has no entries.
pub fn parse_annotation(annotation: &str) -> Vec<Result<EffectEntry, AnnotationEntryParseError>> {
    if annotation.trim().is_empty() {
        return vec![];
    }
    annotation.split(EFFECT_DELIMITER)
        .map(parse_entry)
        .collect()
}

/// Parses one `EFFECT(...)` entry.
/// # Arguments
/// * `entry` - the raw entry text, without the `,` separators
/// # Errors
/// * if the entry does not have exactly one non-empty metadata group, or the group has the wrong number of sub-fields
/// * if the effect combines more than two consequence terms
pub fn parse_entry(entry: &str) -> Result<EffectEntry, AnnotationEntryParseError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(AnnotationEntryParseError::new(entry, "empty entry"));
    }

    let open_count = entry.matches(METADATA_OPEN).count();
    let close_count = entry.matches(METADATA_CLOSE).count();
    if open_count == 0 {
        return Err(AnnotationEntryParseError::new(entry, "missing metadata"));
    }
    if open_count != 1 || close_count != 1 {
        return Err(AnnotationEntryParseError::new(entry, "expected exactly one metadata group"));
    }

    // exactly one of each delimiter at this point
    let (effect, remainder) = entry.split_once(METADATA_OPEN).unwrap_or_default();
    let Some(metadata) = remainder.strip_suffix(METADATA_CLOSE) else {
        return Err(AnnotationEntryParseError::new(entry, "metadata group is not at the end of the entry"));
    };
    if metadata.is_empty() {
        return Err(AnnotationEntryParseError::new(entry, "empty metadata"));
    }

    let fields: Vec<&str> = metadata.split(METADATA_SUBFIELD_DELIMITER).collect();
    if !(MIN_SUBFIELDS..=MAX_SUBFIELDS).contains(&fields.len()) {
        return Err(AnnotationEntryParseError::new(
            entry,
            format!("expected {MIN_SUBFIELDS} to {MAX_SUBFIELDS} metadata sub-fields, found {}", fields.len())
        ));
    }

    let (consequence_type, additional_consequence_type) = split_consequence_terms(effect)
        .map_err(|reason| AnnotationEntryParseError::new(entry, reason))?;

    // everything after GENOTYPE_NUMBER is ERRORS then WARNINGS
    let mut parse_state = ParseState::default();
    for notification_field in fields.iter().skip(MIN_SUBFIELDS) {
        for code in notification_field.split(NOTIFICATION_DELIMITER).map(|c| c.trim()).filter(|c| !c.is_empty()) {
            parse_state.add_error_code(ParseNotification::from_code(code));
        }
    }

    let non_empty = |index: usize| -> Option<String> {
        let value = fields[index].trim();
        if value.is_empty() { None } else { Some(value.to_string()) }
    };

    let codon_change = non_empty(CODON_CHANGE_FIELD);
    let raw_amino_acid_change = non_empty(AMINO_ACID_CHANGE_FIELD);
    let amino_acid_change = raw_amino_acid_change.as_deref().map(|aa_change| {
        if consequence_type == FRAMESHIFT_VARIANT {
            convert_to_frameshift(aa_change)
        } else {
            standardize_amino_acid_change(aa_change)
        }
    });
    let protein_position = amino_acid_change.as_deref()
        .and_then(amino_acid_position)
        .map(|p| p + 1);

    let mut cds_mutation = None;
    let mut cds_position = None;
    if let (Some(codon), Some(aa_change)) = (codon_change.as_deref(), raw_amino_acid_change.as_deref()) {
        match parse_codon_change(codon, aa_change) {
            CodonChange::Unavailable => {},
            CodonChange::NoHighlight => {
                parse_state.add_error_and_message(
                    ParseNotification::CdsMutationFailure,
                    format!("no changed bases highlighted in codon change {codon:?}")
                );
            },
            CodonChange::Derived { position, notation } => {
                cds_position = Some(position);
                cds_mutation = Some(notation);
            }
        };
    }

    let parsed = EffectEntry {
        consequence_type,
        additional_consequence_type,
        effect_impact: fields[IMPACT_FIELD].trim().to_string(),
        functional_class: fields[FUNCTIONAL_CLASS_FIELD].trim().to_string(),
        codon_change,
        amino_acid_change,
        amino_acid_length: non_empty(AMINO_ACID_LENGTH_FIELD),
        gene_id: fields[GENE_NAME_FIELD].trim().to_string(),
        gene_biotype: fields[BIOTYPE_FIELD].trim().to_string(),
        coding: fields[CODING_FIELD].trim().to_string(),
        transcript_id: fields[TRANSCRIPT_ID_FIELD].trim().to_string(),
        exon_rank: non_empty(EXON_RANK_FIELD),
        cds_mutation,
        cds_position,
        protein_position,
        parse_state
    };
    trace!("Parsed effect entry {entry:?} => {parsed:?}");
    Ok(parsed)
}

/// Splits an effect name into its primary and optional secondary consequence terms, applying legacy renames.
/// # Errors
/// * if the name is empty, has an empty term, or combines more than two terms
pub fn split_consequence_terms(effect: &str) -> Result<(String, Option<String>), String> {
    let effect = effect.trim();
    if effect.is_empty() {
        return Err("empty consequence type".to_string());
    }

    let terms: Vec<String> = effect.split(CONSEQUENCE_TERM_DELIMITER)
        .map(|term| {
            let term = term.trim();
            CONSEQUENCE_RENAMES.get(term).copied().unwrap_or(term).to_string()
        })
        .collect();
    if terms.len() > MAX_CONSEQUENCE_TERMS {
        return Err(format!("expected at most {MAX_CONSEQUENCE_TERMS} consequence terms, found {}", terms.len()));
    }
    if terms.iter().any(|t| t.is_empty()) {
        return Err(format!("empty consequence term in {effect:?}"));
    }

    let mut terms = terms.into_iter();
    let primary = terms.next().unwrap_or_default();
    Ok((primary, terms.next()))
}

/// Expands the short amino acid change forms, e.g. `A123` => `A123A` and `*123` => `*123*`
pub fn standardize_amino_acid_change(aa_change: &str) -> String {
    if SHORT_AMINO_ACID_CHANGE.is_match(aa_change) {
        let first = &aa_change[..1];
        format!("{aa_change}{first}")
    } else {
        aa_change.to_string()
    }
}

/// Rewrites frameshift changes into the `X<pos>fs` form, e.g. `-R123` => `X123fs`.
/// Anything that does not start with `-` or does not have exactly one position is returned as-is.
pub fn convert_to_frameshift(aa_change: &str) -> String {
    if !aa_change.starts_with('-') {
        return aa_change.to_string();
    }
    let mut runs = DIGIT_RUN.find_iter(aa_change);
    match (runs.next(), runs.next()) {
        (Some(position), None) => format!("X{}fs", position.as_str()),
        _ => aa_change.to_string()
    }
}

/// 0-based amino acid position from an amino acid change, e.g. `R123` => 122.
/// Returns None unless there is exactly one run of digits holding a 1-based position.
pub fn amino_acid_position(aa_change: &str) -> Option<u64> {
    let mut runs = DIGIT_RUN.find_iter(aa_change);
    let (Some(position), None) = (runs.next(), runs.next()) else {
        return None;
    };
    position.as_str().parse::<u64>().ok()?.checked_sub(1)
}

/// Result of deriving a CDS mutation from a codon change
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CodonChange {
    /// inputs missing or not in the expected shape
    Unavailable,
    /// well-formed codons, but no base is marked as changed
    NoHighlight,
    /// CDS mutation such as `1878G>A`, with its 1-based CDS position
    Derived { position: u64, notation: String }
}

/// Derives the CDS mutation from a codon change and the amino acid change it belongs to.
/// Changed bases are uppercase in either codon, and the changed span runs from the first to the last of them.
/// # Arguments
/// * `codon_change` - codon pair such as `cgG/cgA`
/// * `aa_change` - the raw amino acid change, e.g. `R626`
/// # Examples
/// `("cgG/cgA", "R626")` derives `1878G>A` since `(626 - 1) * 3 + 2 + 1 = 1878`
pub fn parse_codon_change(codon_change: &str, aa_change: &str) -> CodonChange {
    let Some((ref_codon, alt_codon)) = codon_change.split_once('/') else {
        return CodonChange::Unavailable;
    };
    let valid_codon = |codon: &str| codon.len() == 3 && codon.bytes().all(|b| b.is_ascii_alphabetic());
    if !valid_codon(ref_codon) || !valid_codon(alt_codon) {
        return CodonChange::Unavailable;
    }
    let Some(aa_position) = amino_acid_position(aa_change) else {
        return CodonChange::Unavailable;
    };

    let highlighted: Vec<usize> = ref_codon.bytes().zip(alt_codon.bytes())
        .enumerate()
        .filter(|(_i, (r, a))| r.is_ascii_uppercase() || a.is_ascii_uppercase())
        .map(|(i, _pair)| i)
        .collect();
    let (Some(&first), Some(&last)) = (highlighted.first(), highlighted.last()) else {
        return CodonChange::NoHighlight;
    };

    // absurd positions in a malformed entry must not overflow
    let Some(position) = aa_position.checked_mul(3).and_then(|p| p.checked_add(first as u64 + 1)) else {
        return CodonChange::Unavailable;
    };
    let from = ref_codon[first..=last].to_ascii_uppercase();
    let to = alt_codon[first..=last].to_ascii_uppercase();
    CodonChange::Derived {
        position,
        notation: format!("{position}{from}{NOTATION_DELIMITER}{to}")
    }
}
