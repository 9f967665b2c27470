//! Primer engine backed by the primer3 command line tools.
//!
//! `primer3_core` receives one Boulder-IO record on stdin and answers with
//! one record on stdout. Melting temperatures come from `oligotm`, run with
//! its default salt and oligo concentrations.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use primerplan_core::engine::{PrimerEngine, RawDesign};
use primerplan_core::{CoreError, DesignParameters};
use primerplan_formats::boulder::{parse_records, write_record, BoulderRecord};
use primerplan_formats::FormatError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum Primer3Error {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("primer3 reported an error: {0}")]
    Primer3(String),
    #[error("Unexpected {program} output: {output}")]
    Output { program: String, output: String },
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl From<Primer3Error> for CoreError {
    fn from(e: Primer3Error) -> Self {
        CoreError::Engine(e.to_string())
    }
}

/// Where to find the primer3 executables.
#[derive(Debug, Clone)]
pub struct Primer3Config {
    pub primer3_core: PathBuf,
    pub oligotm: PathBuf,
    /// Passed as `PRIMER_THERMODYNAMIC_PARAMETERS_PATH` when set.
    pub thermo_params: Option<PathBuf>,
}

impl Default for Primer3Config {
    fn default() -> Self {
        Self {
            primer3_core: PathBuf::from("primer3_core"),
            oligotm: PathBuf::from("oligotm"),
            thermo_params: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Primer3Engine {
    config: Primer3Config,
}

impl Primer3Engine {
    pub fn new(config: Primer3Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Primer3Config {
        &self.config
    }

    /// The Boulder-IO request for one included region.
    pub fn build_input(
        &self,
        template: &str,
        region_start: usize,
        region_length: usize,
        params: &DesignParameters,
    ) -> BoulderRecord {
        let mut record = BoulderRecord::new();
        record.push("SEQUENCE_ID", "gene");
        record.push("SEQUENCE_TEMPLATE", template);
        record.push(
            "SEQUENCE_INCLUDED_REGION",
            format!("{},{}", region_start, region_length),
        );
        for (key, value) in params.iter() {
            record.push(key, value.to_string());
        }
        if let Some(path) = &self.config.thermo_params {
            record.push(
                "PRIMER_THERMODYNAMIC_PARAMETERS_PATH",
                path.to_string_lossy().into_owned(),
            );
        }
        record
    }

    /// Output of `primer3_core -about`.
    pub fn version(&self) -> Result<String, Primer3Error> {
        let output = run(&self.config.primer3_core, &["-about"], None)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn program_name(path: &Path) -> String {
    path.display().to_string()
}

fn run(program: &Path, args: &[&str], stdin: Option<&[u8]>) -> Result<Output, Primer3Error> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Primer3Error::Spawn {
            program: program_name(program),
            source,
        })?;

    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        pipe.write_all(input).map_err(|source| Primer3Error::Spawn {
            program: program_name(program),
            source,
        })?;
    }

    let output = child.wait_with_output().map_err(|source| Primer3Error::Spawn {
        program: program_name(program),
        source,
    })?;
    if !output.status.success() {
        return Err(Primer3Error::Exit {
            program: program_name(program),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

/// Pull the primer sequences out of a primer3 answer.
pub fn record_to_design(record: &BoulderRecord) -> Result<RawDesign, Primer3Error> {
    if let Some(message) = record.get("PRIMER_ERROR").filter(|m| !m.is_empty()) {
        return Err(Primer3Error::Primer3(message.to_string()));
    }
    Ok(record
        .iter()
        .filter(|(tag, _)| {
            (tag.starts_with("PRIMER_LEFT_") || tag.starts_with("PRIMER_RIGHT_"))
                && tag.ends_with("_SEQUENCE")
        })
        .collect())
}

/// Parse the single number `oligotm` prints.
pub fn parse_tm(output: &str) -> Result<f64, Primer3Error> {
    output
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|tm| tm.is_finite())
        .ok_or_else(|| Primer3Error::Output {
            program: "oligotm".to_string(),
            output: output.trim().to_string(),
        })
}

impl PrimerEngine for Primer3Engine {
    fn design_primers(
        &self,
        template: &str,
        region_start: usize,
        region_length: usize,
        params: &DesignParameters,
    ) -> Result<RawDesign, CoreError> {
        let record = self.build_input(template, region_start, region_length, params);
        let mut input = Vec::new();
        write_record(&record, &mut input).map_err(Primer3Error::from)?;
        debug!(
            region_start,
            region_length,
            tags = record.len(),
            "running primer3_core"
        );

        let output = run(&self.config.primer3_core, &[], Some(input.as_slice()))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let records = parse_records(&stdout).map_err(Primer3Error::from)?;
        let answer = records.first().ok_or_else(|| Primer3Error::Output {
            program: program_name(&self.config.primer3_core),
            output: stdout.trim().to_string(),
        })?;
        Ok(record_to_design(answer)?)
    }

    fn melting_temp(&self, primer: &str) -> Result<f64, CoreError> {
        if primer.is_empty() {
            return Err(CoreError::EmptyPrimer);
        }
        let output = run(&self.config.oligotm, &[primer], None)?;
        Ok(parse_tm(&String::from_utf8_lossy(&output.stdout))?)
    }

    fn name(&self) -> &str {
        "primer3"
    }
}
