use std::path::{Path, PathBuf};

use primerplan_core::{CoreError, ReferenceSequence};
use tracing::{info, warn};

use crate::detect::{detect_format, foreign_characters};
use crate::{FileFormat, FormatError};

/// Clean up a path typed or pasted by a user: surrounding double quotes are
/// dropped and Windows separators become `/`.
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim().trim_matches('"');
    PathBuf::from(trimmed.replace('\\', "/"))
}

/// Build a reference from a file's full contents. Nothing is parsed out.
pub fn reference_from_str(name: &str, content: &str) -> Result<ReferenceSequence, FormatError> {
    if content.is_empty() {
        return Err(FormatError::Core(CoreError::EmptyReference));
    }

    match detect_format(content) {
        FileFormat::Raw => {}
        format => warn!(
            ?format,
            "headers are not parsed and will be counted as sequence"
        ),
    }
    let foreign = foreign_characters(content);
    if foreign > 0 {
        warn!(count = foreign, "reference contains non-nucleotide characters");
    }

    Ok(ReferenceSequence::new(name, content)?)
}

/// Read a reference file. The whole file, line breaks included, is the sequence.
pub fn load_reference(path: impl AsRef<Path>) -> Result<ReferenceSequence, FormatError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reference".to_string());

    let reference = reference_from_str(&name, &content)?;
    info!(path = %path.display(), length = reference.len(), "reference loaded");
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("\"C:\\data\\gene.fa\""),
            PathBuf::from("C:/data/gene.fa")
        );
        assert_eq!(normalize_path("  ./gene.txt \n"), PathBuf::from("./gene.txt"));
    }

    #[test]
    fn test_reference_keeps_line_breaks() {
        let reference = reference_from_str("r", "acgt\nacgt\n").unwrap();
        assert_eq!(reference.len(), 10);
        assert_eq!(reference.as_str(), "ACGT\nACGT\n");
    }

    #[test]
    fn test_non_ascii_reference_rejected() {
        assert!(matches!(
            reference_from_str("r", "ACGTé\nACGT"),
            Err(FormatError::Core(CoreError::NonAsciiReference { position: 4, .. }))
        ));
    }

    #[test]
    fn test_empty_reference_rejected() {
        assert!(matches!(
            reference_from_str("r", ""),
            Err(FormatError::Core(CoreError::EmptyReference))
        ));
    }
}
