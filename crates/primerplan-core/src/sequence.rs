use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// The full contents of a reference file, uppercased.
///
/// Line breaks are kept: absolute coordinates count them, and they are only
/// stripped from an extracted gene window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSequence {
    pub id: Uuid,
    pub name: String,
    sequence: String,
}

impl ReferenceSequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Result<Self, CoreError> {
        let sequence = sequence.into();
        if sequence.is_empty() {
            return Err(CoreError::EmptyReference);
        }
        // Coordinates are byte offsets, so every base must be one byte wide.
        if let Some((position, character)) = sequence.char_indices().find(|(_, c)| !c.is_ascii()) {
            return Err(CoreError::NonAsciiReference {
                character,
                position,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sequence: sequence.to_ascii_uppercase(),
        })
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.sequence
    }

    /// Cut the gene window `[start, end)` out of this reference.
    pub fn window(&self, start: i64, end: i64) -> Result<GeneWindow, CoreError> {
        let gene = extract_window(&self.sequence, start, end)?;
        Ok(GeneWindow {
            start: start as usize,
            end: end as usize,
            gene,
        })
    }
}

/// A gene cut out of a reference, with the absolute coordinates it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneWindow {
    pub start: usize,
    pub end: usize,
    pub gene: String,
}

impl GeneWindow {
    /// Offset added to fragment coordinates to express them against the reference.
    pub fn offset(&self) -> usize {
        self.start
    }

    pub fn gene_len(&self) -> usize {
        self.gene.len()
    }
}

/// Extract `reference[start..end]` with line breaks removed.
pub fn extract_window(reference: &str, start: i64, end: i64) -> Result<String, CoreError> {
    if start < 0 {
        return Err(CoreError::range(start, end, "start must not be negative"));
    }
    if end > reference.len() as i64 {
        return Err(CoreError::range(
            start,
            end,
            format!("end exceeds the reference length ({})", reference.len()),
        ));
    }
    if start >= end {
        return Err(CoreError::range(start, end, "start must be less than end"));
    }

    let slice = reference
        .get(start as usize..end as usize)
        .ok_or_else(|| CoreError::range(start, end, "coordinates split a multi-byte character"))?;

    let gene: String = slice.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    if gene.is_empty() {
        return Err(CoreError::range(start, end, "window contains no bases"));
    }
    Ok(gene)
}
