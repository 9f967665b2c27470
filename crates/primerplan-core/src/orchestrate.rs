use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::engine::{check_region, PrimerEngine};
use crate::error::CoreError;
use crate::evaluate::{evaluate_design, PrimerPair};
use crate::fragment::Fragment;
use crate::params::DesignParameters;
use crate::results::{PairKey, ResultCollection};

/// Pairs designed for one fragment, in engine index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentResult {
    pub pairs: Vec<PrimerPair>,
    /// Pair indices the engine could not fill.
    pub missing: Vec<usize>,
    pub requested: usize,
}

impl FragmentResult {
    /// Requested pairs past the last index the engine answered for.
    pub fn not_returned(&self) -> usize {
        self.requested
            .saturating_sub(self.pairs.len() + self.missing.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentOutcome {
    Designed(FragmentResult),
    Failed(CoreError),
}

impl FragmentOutcome {
    pub fn is_designed(&self) -> bool {
        matches!(self, FragmentOutcome::Designed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentReport {
    /// 1-based fragment number.
    pub number: usize,
    pub fragment: Fragment,
    pub outcome: FragmentOutcome,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct DesignRun {
    pub id: Uuid,
    pub reports: Vec<FragmentReport>,
    pub results: ResultCollection,
}

impl DesignRun {
    pub fn designed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_designed()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.designed()
    }
}

/// Runs the engine over every fragment of a gene.
pub struct FragmentOrchestrator<E> {
    engine: E,
}

impl<E: PrimerEngine> FragmentOrchestrator<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Design primers for each fragment in order.
    ///
    /// The parameter set is checked against the fragments first and an invalid
    /// configuration is returned as an error without calling the engine. After
    /// that the run always completes: a failing fragment is recorded in its
    /// report and contributes nothing to the results.
    pub fn run(
        &self,
        gene: &str,
        fragments: &[Fragment],
        params: &DesignParameters,
    ) -> Result<DesignRun, CoreError> {
        params.validate_for(fragments)?;

        let id = Uuid::new_v4();
        let span = info_span!("design_run", run_id = %id, engine = self.engine.name());
        let _guard = span.enter();

        let mut results = ResultCollection::new();
        let mut reports = Vec::with_capacity(fragments.len());

        for (i, fragment) in fragments.iter().enumerate() {
            let number = i + 1;
            let outcome = match self.design_fragment(gene, fragment, params) {
                Ok(result) => {
                    for pair in &result.pairs {
                        results.push(
                            PairKey::new(number, pair.index),
                            pair.forward.sequence.clone(),
                            pair.reverse.sequence.clone(),
                        );
                    }
                    info!(
                        fragment = number,
                        pairs = result.pairs.len(),
                        missing = result.missing.len(),
                        "fragment designed"
                    );
                    FragmentOutcome::Designed(result)
                }
                Err(e) => {
                    warn!(fragment = number, error = %e, "fragment failed");
                    FragmentOutcome::Failed(e)
                }
            };
            reports.push(FragmentReport {
                number,
                fragment: *fragment,
                outcome,
            });
        }

        info!(
            fragments = reports.len(),
            pairs = results.len(),
            "design run complete"
        );
        Ok(DesignRun {
            id,
            reports,
            results,
        })
    }

    fn design_fragment(
        &self,
        gene: &str,
        fragment: &Fragment,
        params: &DesignParameters,
    ) -> Result<FragmentResult, CoreError> {
        check_region(gene.len(), fragment.relative_start, fragment.length)?;
        debug!(
            start = fragment.relative_start,
            length = fragment.length,
            "requesting primers"
        );
        let raw = self
            .engine
            .design_primers(gene, fragment.relative_start, fragment.length, params)?;
        let design = evaluate_design(&self.engine, &raw, params.num_return())?;
        Ok(FragmentResult {
            pairs: design.pairs,
            missing: design.missing,
            requested: design.requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    fn gene() -> String {
        "ATGCGTACGTTAGCCGATCGGATCCGTAGCTAGGCTTACGATCGATGCATGCCGTAGGCTAGCTAGCGGATCGATCGTAGC"
            .to_string()
    }

    #[test]
    fn test_single_fragment_run() {
        let gene = gene();
        let fragments = [Fragment {
            relative_start: 0,
            length: 80,
        }];
        let params = DesignParameters::defaults(50, 80, 1);
        let orchestrator = FragmentOrchestrator::new(MockEngine::new());

        let run = orchestrator.run(&gene, &fragments, &params).unwrap();
        assert_eq!(run.reports.len(), 1);
        assert_eq!(run.designed(), 1);
        assert_eq!(run.results.len(), 1);
        let entry = run.results.get(PairKey::new(1, 0)).unwrap();
        assert_eq!(entry.forward, &gene[0..20]);
    }

    #[test]
    fn test_invalid_config_never_reaches_engine() {
        let gene = gene();
        let fragments = [
            Fragment {
                relative_start: 0,
                length: 80,
            },
            Fragment {
                relative_start: 0,
                length: 40,
            },
        ];
        let params = DesignParameters::defaults(30, 60, 1);
        let orchestrator = FragmentOrchestrator::new(MockEngine::new());

        assert!(matches!(
            orchestrator.run(&gene, &fragments, &params),
            Err(CoreError::AmpliconRange { .. })
        ));
        assert_eq!(orchestrator.engine().calls(), 0);
    }

    #[test]
    fn test_failures_are_isolated() {
        let gene = gene();
        let fragments = [
            Fragment {
                relative_start: 0,
                length: 40,
            },
            Fragment {
                relative_start: 70,
                length: 40,
            },
            Fragment {
                relative_start: 40,
                length: 40,
            },
        ];
        let params = DesignParameters::defaults(30, 40, 2);
        let engine = MockEngine::new()
            .with_primer_len(10)
            .with_failure_at(0, "constraints unsatisfiable");
        let orchestrator = FragmentOrchestrator::new(engine);

        let run = orchestrator.run(&gene, &fragments, &params).unwrap();
        assert_eq!(run.reports.len(), 3);
        assert!(matches!(
            run.reports[0].outcome,
            FragmentOutcome::Failed(CoreError::Engine(_))
        ));
        assert!(matches!(
            run.reports[1].outcome,
            FragmentOutcome::Failed(CoreError::RegionOverflow { .. })
        ));
        assert!(run.reports[2].outcome.is_designed());

        // Overflow is caught before the engine is asked.
        assert_eq!(orchestrator.engine().calls(), 2);
        assert_eq!(run.failed(), 2);
        let keys: Vec<PairKey> = run.results.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![PairKey::new(3, 0), PairKey::new(3, 1)]);
    }

    #[test]
    fn test_bad_strand_fails_whole_fragment() {
        let gene = gene();
        let fragments = [Fragment {
            relative_start: 0,
            length: 80,
        }];
        let params = DesignParameters::defaults(50, 80, 2);
        let engine = MockEngine::new().with_raw_value(0, "PRIMER_RIGHT_1_SEQUENCE", "");
        let run = FragmentOrchestrator::new(engine)
            .run(&gene, &fragments, &params)
            .unwrap();

        assert_eq!(
            run.reports[0].outcome,
            FragmentOutcome::Failed(CoreError::EmptyPrimer)
        );
        assert!(run.results.is_empty());
    }

    #[test]
    fn test_missing_pairs_are_skipped() {
        let gene = gene();
        let fragments = [Fragment {
            relative_start: 0,
            length: 80,
        }];
        let params = DesignParameters::defaults(50, 80, 3);
        let engine = MockEngine::new().with_missing_pair(1);
        let run = FragmentOrchestrator::new(engine)
            .run(&gene, &fragments, &params)
            .unwrap();

        match &run.reports[0].outcome {
            FragmentOutcome::Designed(result) => {
                assert_eq!(result.pairs.len(), 2);
                assert_eq!(result.missing, vec![1]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(run.results.get(PairKey::new(1, 1)).is_none());
        assert!(run.results.get(PairKey::new(1, 2)).is_some());
    }
}
