//! Deterministic in-process engine for tests and dry runs.
//!
//! Pair `i` takes the forward primer from the start of the region shifted by
//! `i` bases, and the reverse primer as the reverse complement of the region's
//! tail shifted back by `i` bases. Tm uses the Wallace rule up to 14 bases
//! and the basic GC formula above that.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::{forward_key, reverse_key, PrimerEngine, RawDesign};
use crate::error::CoreError;
use crate::operations::reverse_complement;
use crate::params::{DesignParameters, ParamValue};

#[derive(Debug, Default)]
pub struct MockEngine {
    primer_len: Option<usize>,
    failures: BTreeMap<usize, String>,
    missing_pairs: BTreeSet<usize>,
    overrides: BTreeMap<(usize, String), String>,
    calls: Cell<usize>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed primer length instead of `PRIMER_OPT_SIZE`.
    pub fn with_primer_len(mut self, len: usize) -> Self {
        self.primer_len = Some(len);
        self
    }

    /// Fail every request whose region starts at `region_start`.
    pub fn with_failure_at(mut self, region_start: usize, message: impl Into<String>) -> Self {
        self.failures.insert(region_start, message.into());
        self
    }

    /// Drop the reverse strand of pair `index` from every design.
    pub fn with_missing_pair(mut self, index: usize) -> Self {
        self.missing_pairs.insert(index);
        self
    }

    /// Replace `key` in the output of the region starting at `region_start`.
    pub fn with_raw_value(
        mut self,
        region_start: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.overrides
            .insert((region_start, key.into()), value.into());
        self
    }

    /// Number of `design_primers` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn primer_len(&self, params: &DesignParameters) -> usize {
        self.primer_len.unwrap_or_else(|| match params.get("PRIMER_OPT_SIZE") {
            Some(ParamValue::Int(n)) if *n > 0 => *n as usize,
            _ => 20,
        })
    }
}

impl PrimerEngine for MockEngine {
    fn design_primers(
        &self,
        template: &str,
        region_start: usize,
        region_length: usize,
        params: &DesignParameters,
    ) -> Result<RawDesign, CoreError> {
        self.calls.set(self.calls.get() + 1);

        if let Some(message) = self.failures.get(&region_start) {
            return Err(CoreError::Engine(message.clone()));
        }

        let region = template
            .get(region_start..region_start + region_length)
            .ok_or(CoreError::RegionOverflow {
                start: region_start,
                length: region_length,
                template_len: template.len(),
            })?;
        let len = self.primer_len(params);

        let mut raw = RawDesign::new();
        for i in 0..params.num_return() {
            if 2 * (len + i) > region.len() {
                break;
            }
            let head = region.get(i..i + len);
            let tail = region.get(region.len() - len - i..region.len() - i);
            let (Some(head), Some(tail)) = (head, tail) else {
                return Err(CoreError::Engine(format!(
                    "pair {} does not fall on character boundaries",
                    i
                )));
            };
            raw.insert(forward_key(i), head);
            if !self.missing_pairs.contains(&i) {
                raw.insert(reverse_key(i), reverse_complement(tail));
            }
        }
        for ((start, key), value) in &self.overrides {
            if *start == region_start {
                raw.insert(key.clone(), value.clone());
            }
        }
        Ok(raw)
    }

    fn melting_temp(&self, primer: &str) -> Result<f64, CoreError> {
        if primer.is_empty() {
            return Err(CoreError::EmptyPrimer);
        }
        let upper = primer.to_ascii_uppercase();
        let gc = upper.chars().filter(|c| matches!(c, 'G' | 'C')).count() as f64;
        let at = upper.chars().filter(|c| matches!(c, 'A' | 'T')).count() as f64;
        let n = upper.len() as f64;
        if upper.len() <= 14 {
            Ok(2.0 * at + 4.0 * gc)
        } else {
            Ok(64.9 + 41.0 * (gc - 16.4) / n)
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> String {
        "ACGTTGCAAGGCTTACCGATGGCATTACGATCGGATCCATGCAAGTCGATTACGGCATCGA".to_string()
    }

    #[test]
    fn test_pairs_come_from_region_ends() {
        let engine = MockEngine::new().with_primer_len(5);
        let params = DesignParameters::defaults(10, 20, 2);
        let t = template();
        let raw = engine.design_primers(&t, 10, 30, &params).unwrap();

        let (fwd, rev) = raw.pair(0).unwrap();
        assert_eq!(fwd, &t[10..15]);
        assert_eq!(rev, reverse_complement(&t[35..40]));
        let (fwd1, _) = raw.pair(1).unwrap();
        assert_eq!(fwd1, &t[11..16]);
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn test_injected_failures() {
        let engine = MockEngine::new()
            .with_failure_at(0, "no primers")
            .with_missing_pair(1);
        let params = DesignParameters::defaults(10, 20, 2);
        let t = template();

        assert_eq!(
            engine.design_primers(&t, 0, 50, &params),
            Err(CoreError::Engine("no primers".to_string()))
        );
        let raw = engine.design_primers(&t, 5, 55, &params).unwrap();
        assert!(raw.pair(0).is_some());
        assert!(raw.pair(1).is_none());
    }

    #[test]
    fn test_wallace_tm() {
        let engine = MockEngine::new();
        assert_eq!(engine.melting_temp("GCGC").unwrap(), 16.0);
        assert_eq!(engine.melting_temp("atat").unwrap(), 8.0);
        assert!(engine.melting_temp("").is_err());
    }

    #[test]
    fn test_wallace_rule_covers_14_bases() {
        let engine = MockEngine::new();
        // A4 C4 G3 T3: 2 * 7 + 4 * 7
        assert_eq!(engine.melting_temp("ACGTACGTACGTAC").unwrap(), 42.0);
        let fifteen = engine.melting_temp("ACGTACGTACGTACG").unwrap();
        assert_eq!(fifteen, 64.9 + 41.0 * (8.0 - 16.4) / 15.0);
    }

    #[test]
    fn test_multibyte_template_is_engine_error() {
        let engine = MockEngine::new();
        let params = DesignParameters::defaults(10, 20, 1);
        let template = format!("{}é{}", "A".repeat(19), "ACGT".repeat(20));

        assert!(matches!(
            engine.design_primers(&template, 0, template.len(), &params),
            Err(CoreError::Engine(_))
        ));
    }
}
