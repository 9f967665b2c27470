use std::sync::OnceLock;

use regex::Regex;

/// Complement a single DNA base
pub fn complement_base(base: char) -> char {
    match base.to_ascii_uppercase() {
        'A' => 'T',
        'T' => 'A',
        'G' => 'C',
        'C' => 'G',
        'R' => 'Y',
        'Y' => 'R',
        'S' => 'S',
        'W' => 'W',
        'K' => 'M',
        'M' => 'K',
        'B' => 'V',
        'V' => 'B',
        'D' => 'H',
        'H' => 'D',
        'N' => 'N',
        other => other,
    }
}

/// Reverse complement of a DNA sequence
pub fn reverse_complement(seq: &str) -> String {
    seq.chars().rev().map(complement_base).collect()
}

/// Calculate GC content as a fraction (0.0 to 1.0)
pub fn gc_content(seq: &str) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc_count = seq
        .chars()
        .filter(|c| matches!(c.to_ascii_uppercase(), 'G' | 'C'))
        .count();
    gc_count as f64 / seq.len() as f64
}

/// GC content as a percentage (0.0 to 100.0)
pub fn gc_percent(seq: &str) -> f64 {
    100.0 * gc_content(seq)
}

fn iupac_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[ACGTURYSWKMBDHVN]+$").unwrap())
}

/// True if `seq` is non-empty and uses only IUPAC nucleotide codes (case-insensitive).
pub fn is_nucleotide_sequence(seq: &str) -> bool {
    iupac_pattern().is_match(&seq.to_ascii_uppercase())
}
