//! Runs against a real primer3 installation when one is on `PATH`;
//! otherwise each test returns early.

use primerplan_core::engine::mock::MockEngine;
use primerplan_core::engine::PrimerEngine;
use primerplan_core::fragment::plan_fragments;
use primerplan_core::{
    DesignParameters, FragmentOrchestrator, FragmentOutcome, PairKey, ReferenceSequence,
};
use primerplan_primer3::Primer3Engine;

const TEMPLATE: &str = "GCTTGCATGCCTGCAGGTCGACTCTAGAGGATCCCCGGGTACCGAGCTCGAATTCACTGGCCGTCGTTTTACAACGTCGTGACTGGGAAAACCCTGGCGTTACCCAACTTAATCGCCTTGCAGCACATCCCCCTTTCGCCAGCTGGCGTAATAGCGAAGAGGCCCGCACCGATCGCCCTTCCCAACAGTTGCGCAGCCTGAATGGCGAATGGCGCCTGATGCGGTATTTTCTCCTTACGCATCTGTGCGGTATTTCACACCGCATATGGTGCACTCTCAGTACAATCTGCTCTGATGCCGCATAG";

fn primer3() -> Option<Primer3Engine> {
    let engine = Primer3Engine::default();
    engine.version().ok().map(|_| engine)
}

#[test]
fn test_primer3_designs_or_fails_cleanly() {
    let Some(engine) = primer3() else {
        return;
    };
    let reference = ReferenceSequence::new("puc19-mcs", TEMPLATE).unwrap();
    let window = reference.window(0, TEMPLATE.len() as i64).unwrap();
    let fragments = plan_fragments(&window, &[(0, 300)]).unwrap();
    let params = DesignParameters::defaults(150, 300, 1);

    let run = FragmentOrchestrator::new(engine)
        .run(&window.gene, &fragments, &params)
        .unwrap();

    match &run.reports[0].outcome {
        FragmentOutcome::Designed(result) => {
            assert_eq!(run.results.len(), result.pairs.len());
            if let Some(pair) = result.pairs.first() {
                assert!(run.results.get(PairKey::new(1, pair.index)).is_some());
                assert!(pair.forward.tm > 30.0 && pair.forward.tm < 80.0);
            }
        }
        FragmentOutcome::Failed(_) => assert!(run.results.is_empty()),
    }
}

#[test]
fn test_oligotm_tracks_gc() {
    let Some(engine) = primer3() else {
        return;
    };
    // primer3_core can be installed without oligotm.
    let (Ok(rich), Ok(poor)) = (
        engine.melting_temp("GCGCGGCCGCGGCGCCGCGC"),
        engine.melting_temp("ATATTAATATATTAATATAT"),
    ) else {
        return;
    };
    assert!(rich > poor);

    // Sanity check that the mock agrees on ordering.
    let mock = MockEngine::new();
    let mock_rich = mock.melting_temp("GCGCGGCCGCGGCGCCGCGC").unwrap();
    let mock_poor = mock.melting_temp("ATATTAATATATTAATATAT").unwrap();
    assert!(mock_rich > mock_poor);
}
