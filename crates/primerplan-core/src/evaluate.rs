use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::{PrimerEngine, RawDesign};
use crate::error::CoreError;
use crate::operations::{gc_percent, is_nucleotide_sequence};

/// One strand of a designed pair with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimerCandidate {
    /// Uppercase primer sequence, 5' to 3'.
    pub sequence: String,
    /// GC content, 0 to 100.
    pub gc_percent: f64,
    /// Melting temperature in °C.
    pub tm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimerPair {
    /// 0-based index of the pair in the engine output.
    pub index: usize,
    pub forward: PrimerCandidate,
    pub reverse: PrimerCandidate,
}

/// Pairs built from one engine response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluatedDesign {
    pub pairs: Vec<PrimerPair>,
    /// Indices for which the engine returned at most one strand.
    pub missing: Vec<usize>,
    /// Pairs asked for; indices past the engine's last one are not listed in `missing`.
    pub requested: usize,
}

/// Compute GC% and Tm for a primer.
///
/// Tm comes from the engine's default conditions; the salt and DNA
/// concentrations in the parameter set are not passed along.
pub fn evaluate<E: PrimerEngine + ?Sized>(engine: &E, primer: &str) -> Result<PrimerCandidate, CoreError> {
    let sequence = primer.to_uppercase();
    if sequence.is_empty() {
        return Err(CoreError::EmptyPrimer);
    }
    if !is_nucleotide_sequence(&sequence) {
        return Err(CoreError::InvalidPrimer(primer.to_string()));
    }
    let gc_percent = gc_percent(&sequence);
    let tm = engine.melting_temp(&sequence)?;
    Ok(PrimerCandidate {
        sequence,
        gc_percent,
        tm,
    })
}

pub fn evaluate_pair<E: PrimerEngine + ?Sized>(
    engine: &E,
    index: usize,
    forward: &str,
    reverse: &str,
) -> Result<PrimerPair, CoreError> {
    Ok(PrimerPair {
        index,
        forward: evaluate(engine, forward)?,
        reverse: evaluate(engine, reverse)?,
    })
}

/// Evaluate pairs `0..num_return` of `raw`, skipping indices with a missing strand.
///
/// Only indices up to the highest one the engine returned are visited. Any
/// strand that fails evaluation fails the whole design.
pub fn evaluate_design<E: PrimerEngine + ?Sized>(
    engine: &E,
    raw: &RawDesign,
    num_return: usize,
) -> Result<EvaluatedDesign, CoreError> {
    let returned = raw.max_index().map_or(0, |i| i + 1);
    let limit = num_return.min(returned);
    let mut design = EvaluatedDesign {
        requested: num_return,
        ..EvaluatedDesign::default()
    };
    for index in 0..limit {
        match raw.pair(index) {
            Some((forward, reverse)) => {
                design
                    .pairs
                    .push(evaluate_pair(engine, index, forward, reverse)?);
            }
            None => {
                warn!(pair = index + 1, "primer pair could not be designed");
                design.missing.push(index);
            }
        }
    }
    if limit < num_return {
        warn!(
            requested = num_return,
            returned = limit,
            "engine returned fewer primer pairs than requested"
        );
    }
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::engine::{forward_key, reverse_key};

    #[test]
    fn test_evaluate_gc_extremes() {
        let engine = MockEngine::new();
        let gc = evaluate(&engine, "GCGC").unwrap();
        assert_eq!(gc.gc_percent, 100.0);
        assert_eq!(gc.tm, engine.melting_temp("GCGC").unwrap());

        let at = evaluate(&engine, "atat").unwrap();
        assert_eq!(at.sequence, "ATAT");
        assert_eq!(at.gc_percent, 0.0);
        assert_eq!(at.tm, engine.melting_temp("ATAT").unwrap());
    }

    #[test]
    fn test_evaluate_rejects_empty_and_garbage() {
        let engine = MockEngine::new();
        assert_eq!(evaluate(&engine, ""), Err(CoreError::EmptyPrimer));
        assert!(matches!(
            evaluate(&engine, "ACGT-ACGT"),
            Err(CoreError::InvalidPrimer(_))
        ));
    }

    #[test]
    fn test_evaluate_design_skips_half_pairs() {
        let engine = MockEngine::new();
        let raw: RawDesign = [
            (forward_key(0), "ACGTACGTAC"),
            (reverse_key(0), "GGGCCCAATT"),
            (reverse_key(1), "GGGCCCAATA"),
            (forward_key(2), "ACGTACGTAA"),
            (reverse_key(2), "GGGCCCAATG"),
        ]
        .into_iter()
        .collect();

        let design = evaluate_design(&engine, &raw, 3).unwrap();
        let indices: Vec<usize> = design.pairs.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(design.missing, vec![1]);
        assert_eq!(design.pairs[0].reverse.gc_percent, 60.0);
    }

    #[test]
    fn test_evaluate_design_stops_at_last_returned_index() {
        let engine = MockEngine::new();
        let raw: RawDesign = [(forward_key(0), "ACGTACGTAC"), (reverse_key(0), "GGGCCCAATT")]
            .into_iter()
            .collect();

        let design = evaluate_design(&engine, &raw, 1_000_000_000).unwrap();
        assert_eq!(design.pairs.len(), 1);
        assert!(design.missing.is_empty());
        assert_eq!(design.requested, 1_000_000_000);

        let design = evaluate_design(&engine, &RawDesign::new(), 3).unwrap();
        assert!(design.pairs.is_empty());
        assert_eq!(design.requested, 3);
    }

    #[test]
    fn test_evaluate_design_fails_on_bad_strand() {
        let engine = MockEngine::new();
        let raw: RawDesign = [(forward_key(0), "ACGT"), (reverse_key(0), "")]
            .into_iter()
            .collect();
        assert_eq!(
            evaluate_design(&engine, &raw, 1),
            Err(CoreError::EmptyPrimer)
        );
    }
}
