//! Human-readable run report.

use std::io::Write;

use primerplan_core::{DesignRun, FragmentOutcome, FragmentReport, PrimerCandidate};

fn candidate(label: &str, n: usize, c: &PrimerCandidate) -> String {
    format!(
        "{} Primer {}: {} (GC%: {:.2}, Tm: {:.2})",
        label, n, c.sequence, c.gc_percent, c.tm
    )
}

/// Write the block for one fragment.
pub fn write_fragment<W: Write>(report: &FragmentReport, out: &mut W) -> std::io::Result<()> {
    match &report.outcome {
        FragmentOutcome::Designed(result) => {
            writeln!(out, "Fragment {}:", report.number)?;
            for pair in &result.pairs {
                writeln!(out, "{}", candidate("Forward", pair.index + 1, &pair.forward))?;
                writeln!(out, "{}", candidate("Reverse", pair.index + 1, &pair.reverse))?;
                writeln!(out)?;
            }
            for index in &result.missing {
                writeln!(out, "Warning: Primer {} could not be designed.", index + 1)?;
            }
            if result.not_returned() > 0 {
                writeln!(
                    out,
                    "Warning: the engine returned {} of {} requested primer pairs.",
                    result.pairs.len() + result.missing.len(),
                    result.requested
                )?;
            }
        }
        FragmentOutcome::Failed(e) => {
            writeln!(out, "Error in fragment {}: {}", report.number, e)?;
        }
    }
    Ok(())
}

/// Write every fragment block in order.
pub fn write_run<W: Write>(run: &DesignRun, out: &mut W) -> std::io::Result<()> {
    for report in &run.reports {
        write_fragment(report, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use primerplan_core::{CoreError, Fragment, FragmentResult, PrimerPair, ResultCollection};
    use uuid::Uuid;

    use super::*;

    fn candidate(sequence: &str, gc_percent: f64, tm: f64) -> PrimerCandidate {
        PrimerCandidate {
            sequence: sequence.to_string(),
            gc_percent,
            tm,
        }
    }

    #[test]
    fn test_report_lines() {
        let run = DesignRun {
            id: Uuid::new_v4(),
            reports: vec![
                FragmentReport {
                    number: 1,
                    fragment: Fragment {
                        relative_start: 0,
                        length: 40,
                    },
                    outcome: FragmentOutcome::Designed(FragmentResult {
                        pairs: vec![PrimerPair {
                            index: 0,
                            forward: candidate("GCGC", 100.0, 12.0),
                            reverse: candidate("ATAT", 0.0, 8.0),
                        }],
                        missing: vec![1],
                        requested: 5,
                    }),
                },
                FragmentReport {
                    number: 2,
                    fragment: Fragment {
                        relative_start: 40,
                        length: 40,
                    },
                    outcome: FragmentOutcome::Failed(CoreError::Engine("boom".to_string())),
                },
            ],
            results: ResultCollection::new(),
        };

        let mut out = Vec::new();
        write_run(&run, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Fragment 1:",
                "Forward Primer 1: GCGC (GC%: 100.00, Tm: 12.00)",
                "Reverse Primer 1: ATAT (GC%: 0.00, Tm: 8.00)",
                "",
                "Warning: Primer 2 could not be designed.",
                "Warning: the engine returned 2 of 5 requested primer pairs.",
                "Error in fragment 2: Primer engine failed: boom",
            ]
        );
    }
}
