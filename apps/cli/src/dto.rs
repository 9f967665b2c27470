//! Flat, JSON-friendly DTOs for `design --json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use primerplan_core::{
    DesignParameters, DesignRun, FragmentOutcome, FragmentReport, PrimerCandidate, PrimerPair,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportDto {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub gene_length: usize,
    pub parameters: Vec<ParameterDto>,
    pub fragments: Vec<FragmentDto>,
    pub designed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDto {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentDto {
    pub number: usize,
    pub relative_start: usize,
    pub length: usize,
    pub status: String,
    pub error: Option<String>,
    pub pairs: Vec<PairDto>,
    pub missing: Vec<usize>,
    pub requested: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairDto {
    pub key: String,
    pub index: usize,
    pub forward: CandidateDto,
    pub reverse: CandidateDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDto {
    pub sequence: String,
    pub gc_percent: f64,
    pub tm: f64,
}

impl From<&PrimerCandidate> for CandidateDto {
    fn from(c: &PrimerCandidate) -> Self {
        CandidateDto {
            sequence: c.sequence.clone(),
            gc_percent: c.gc_percent,
            tm: c.tm,
        }
    }
}

impl PairDto {
    fn new(fragment: usize, pair: &PrimerPair) -> Self {
        PairDto {
            key: primerplan_core::PairKey::new(fragment, pair.index).to_string(),
            index: pair.index,
            forward: CandidateDto::from(&pair.forward),
            reverse: CandidateDto::from(&pair.reverse),
        }
    }
}

impl From<&FragmentReport> for FragmentDto {
    fn from(r: &FragmentReport) -> Self {
        let (status, error, pairs, missing, requested) = match &r.outcome {
            FragmentOutcome::Designed(result) => (
                "designed",
                None,
                result
                    .pairs
                    .iter()
                    .map(|p| PairDto::new(r.number, p))
                    .collect(),
                result.missing.clone(),
                result.requested,
            ),
            FragmentOutcome::Failed(e) => {
                ("failed", Some(e.to_string()), Vec::new(), Vec::new(), 0)
            }
        };
        FragmentDto {
            number: r.number,
            relative_start: r.fragment.relative_start,
            length: r.fragment.length,
            status: status.to_string(),
            error,
            pairs,
            missing,
            requested,
        }
    }
}

impl RunReportDto {
    pub fn new(run: &DesignRun, gene_length: usize, params: &DesignParameters) -> Self {
        RunReportDto {
            run_id: run.id.to_string(),
            generated_at: Utc::now(),
            gene_length,
            parameters: params
                .iter()
                .map(|(key, value)| ParameterDto {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            fragments: run.reports.iter().map(FragmentDto::from).collect(),
            designed: run.designed(),
            failed: run.failed(),
        }
    }
}
