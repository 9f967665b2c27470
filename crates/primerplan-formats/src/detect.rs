use crate::FileFormat;

/// Guess what kind of file `content` came from.
///
/// Reference loading never parses headers; this only decides whether to warn
/// that header text will end up inside the sequence.
pub fn detect_format(content: &str) -> FileFormat {
    let trimmed = content.trim_start();

    if trimmed.starts_with("LOCUS") {
        FileFormat::GenBank
    } else if trimmed.starts_with('>') {
        FileFormat::Fasta
    } else if trimmed.starts_with("ID ") {
        FileFormat::Embl
    } else {
        FileFormat::Raw
    }
}

/// Characters in `content` that are neither nucleotide codes nor line breaks.
pub fn foreign_characters(content: &str) -> usize {
    content
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .filter(|c| !"ACGTUNRYSWKMBDHV".contains(c.to_ascii_uppercase()))
        .count()
}
