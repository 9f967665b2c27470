//! Engine selection and parameter overrides from flags and files.

use std::path::Path;

use anyhow::{bail, Context, Result};
use primerplan_core::engine::mock::MockEngine;
use primerplan_core::engine::PrimerEngine;
use primerplan_core::{CoreError, DesignParameters};
use primerplan_primer3::{Primer3Config, Primer3Engine};
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::{EngineArgs, EngineKind};

pub fn build_engine(args: &EngineArgs) -> Box<dyn PrimerEngine> {
    match args.engine {
        EngineKind::Mock => Box::new(MockEngine::new()),
        EngineKind::Primer3 => Box::new(Primer3Engine::new(Primer3Config {
            primer3_core: args.primer3_core.clone(),
            oligotm: args.oligotm.clone(),
            thermo_params: args.thermo_params.clone(),
        })),
    }
}

/// Turn one JSON value into the text an override expects.
fn json_to_raw(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(items) => {
            let mut ranges = Vec::with_capacity(items.len());
            for item in items {
                match item.as_array().map(Vec::as_slice) {
                    Some([Value::Number(a), Value::Number(b)]) => ranges.push(format!("{}-{}", a, b)),
                    _ => bail!("{}: expected [[min, max], ...], got {}", key, value),
                }
            }
            Ok(ranges.join(" "))
        }
        other => bail!("{}: unsupported value {}", key, other),
    }
}

/// Parse a JSON object of overrides into `(key, raw)` pairs, sorted by key.
pub fn parse_params_json(text: &str) -> Result<Vec<(String, String)>> {
    let value: Value = serde_json::from_str(text).context("Invalid parameter JSON")?;
    let Value::Object(map) = value else {
        bail!("Parameter file must hold a JSON object");
    };
    map.iter()
        .map(|(key, value)| Ok((key.clone(), json_to_raw(key, value)?)))
        .collect()
}

pub fn read_params_file(path: &Path) -> Result<Vec<(String, String)>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
    parse_params_json(&text).with_context(|| format!("In {}", path.display()))
}

/// Apply every override. Rejected ones are logged and returned; the rest still apply.
pub fn apply_overrides(
    params: &mut DesignParameters,
    overrides: &[(String, String)],
) -> Vec<CoreError> {
    let mut rejected = Vec::new();
    for (key, raw) in overrides {
        match params.override_value(key, raw) {
            Ok(value) => info!(key = %key, value = %value, "parameter overridden"),
            Err(e) => {
                warn!(key = %key, error = %e, "override rejected");
                rejected.push(e);
            }
        }
    }
    rejected
}
