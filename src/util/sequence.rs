
/// Checks that a sequence only contains the uppercase nucleotide alphabet (A, C, G, T, N).
/// An empty sequence passes.
/// # Arguments
/// * `sequence` - the sequence to check
pub fn is_nucleotide_sequence(sequence: &str) -> bool {
    sequence.bytes().all(|c| matches!(c, b'A' | b'C' | b'G' | b'T' | b'N'))
}

/// Uppercases a fetched sequence so soft-masked references compare cleanly.
/// # Arguments
/// * `sequence` - raw bytes from a reference
/// # Errors
/// * if the bytes are not valid UTF-8
pub fn normalize_fetched(sequence: &[u8]) -> Result<String, std::str::Utf8Error> {
    Ok(std::str::from_utf8(sequence)?.to_ascii_uppercase())
}
