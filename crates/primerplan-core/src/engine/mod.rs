//! Boundary to the primer design engine.
//!
//! The core never computes thermodynamics itself. An engine takes a template,
//! an included region and a [`DesignParameters`] set, and hands back raw
//! candidates keyed by strand and index, plus a melting temperature on demand.

pub mod mock;

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::params::DesignParameters;

/// Key under which the engine reports the forward primer of pair `index`.
pub fn forward_key(index: usize) -> String {
    format!("PRIMER_LEFT_{}_SEQUENCE", index)
}

/// Key under which the engine reports the reverse primer of pair `index`.
pub fn reverse_key(index: usize) -> String {
    format!("PRIMER_RIGHT_{}_SEQUENCE", index)
}

fn pair_index(key: &str) -> Option<usize> {
    let rest = key
        .strip_prefix("PRIMER_LEFT_")
        .or_else(|| key.strip_prefix("PRIMER_RIGHT_"))?;
    rest.strip_suffix("_SEQUENCE")?.parse().ok()
}

/// Raw engine output. Only the per-index sequences are consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDesign {
    values: BTreeMap<String, String>,
}

impl RawDesign {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn forward(&self, index: usize) -> Option<&str> {
        self.get(&forward_key(index))
    }

    pub fn reverse(&self, index: usize) -> Option<&str> {
        self.get(&reverse_key(index))
    }

    /// Both strands of pair `index`, or `None` if the engine returned only one or neither.
    pub fn pair(&self, index: usize) -> Option<(&str, &str)> {
        Some((self.forward(index)?, self.reverse(index)?))
    }

    /// Highest pair index for which the engine returned either strand.
    pub fn max_index(&self) -> Option<usize> {
        self.values.keys().filter_map(|key| pair_index(key)).max()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawDesign {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A primer design engine.
pub trait PrimerEngine {
    /// Design primer pairs inside `template[region_start..region_start + region_length]`.
    fn design_primers(
        &self,
        template: &str,
        region_start: usize,
        region_length: usize,
        params: &DesignParameters,
    ) -> Result<RawDesign, CoreError>;

    /// Melting temperature of `primer` in °C under the engine's default conditions.
    fn melting_temp(&self, primer: &str) -> Result<f64, CoreError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "engine"
    }
}

impl<E: PrimerEngine + ?Sized> PrimerEngine for &E {
    fn design_primers(
        &self,
        template: &str,
        region_start: usize,
        region_length: usize,
        params: &DesignParameters,
    ) -> Result<RawDesign, CoreError> {
        (**self).design_primers(template, region_start, region_length, params)
    }

    fn melting_temp(&self, primer: &str) -> Result<f64, CoreError> {
        (**self).melting_temp(primer)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<E: PrimerEngine + ?Sized> PrimerEngine for Box<E> {
    fn design_primers(
        &self,
        template: &str,
        region_start: usize,
        region_length: usize,
        params: &DesignParameters,
    ) -> Result<RawDesign, CoreError> {
        (**self).design_primers(template, region_start, region_length, params)
    }

    fn melting_temp(&self, primer: &str) -> Result<f64, CoreError> {
        (**self).melting_temp(primer)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// The included region must lie inside the template.
pub fn check_region(template_len: usize, region_start: usize, region_length: usize) -> Result<(), CoreError> {
    match region_start.checked_add(region_length) {
        Some(end) if end <= template_len => Ok(()),
        _ => Err(CoreError::RegionOverflow {
            start: region_start,
            length: region_length,
            template_len,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_requires_both_strands() {
        let raw: RawDesign = [
            (forward_key(0), "ACGTACGTACGTACGTACGT"),
            (reverse_key(0), "TTTTCCCCGGGGAAAATTTT"),
            (forward_key(1), "ACGTACGTACGTACGTACGA"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            raw.pair(0),
            Some(("ACGTACGTACGTACGTACGT", "TTTTCCCCGGGGAAAATTTT"))
        );
        assert_eq!(raw.pair(1), None);
        assert_eq!(raw.pair(2), None);
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn test_max_index_ignores_other_tags() {
        let raw: RawDesign = [
            (forward_key(0), "ACGT"),
            (reverse_key(3), "ACGT"),
            ("PRIMER_LEFT_7_TM".to_string(), "52.0"),
            ("PRIMER_PAIR_NUM_RETURNED".to_string(), "9"),
        ]
        .into_iter()
        .collect();
        assert_eq!(raw.max_index(), Some(3));
        assert_eq!(RawDesign::new().max_index(), None);
    }

    #[test]
    fn test_check_region() {
        assert!(check_region(100, 0, 100).is_ok());
        assert!(check_region(100, 20, 80).is_ok());
        assert_eq!(
            check_region(100, 21, 80),
            Err(CoreError::RegionOverflow {
                start: 21,
                length: 80,
                template_len: 100
            })
        );
        assert!(check_region(100, usize::MAX, 2).is_err());
    }
}
