use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Reference sequence is empty")]
    EmptyReference,
    #[error("Reference contains non-ASCII character '{character}' at byte {position}")]
    NonAsciiReference { character: char, position: usize },
    #[error("Invalid range {start}..{end}: {reason}")]
    Range {
        start: i64,
        end: i64,
        reason: String,
    },
    #[error("At least one fragment is required")]
    NoFragments,
    #[error("Only {planned} of {expected} fragments were planned")]
    IncompletePlan { planned: usize, expected: usize },
    #[error("Fragment {number}: {source}")]
    InvalidFragment {
        number: usize,
        #[source]
        source: Box<CoreError>,
    },
    #[error("{0} is not a valid parameter name")]
    UnknownParameter(String),
    #[error("Invalid value '{value}' for {key}: expected {expected}")]
    InvalidParameterValue {
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("Invalid amplicon size range {min}-{max}: {reason}")]
    AmpliconRange { min: u32, max: u32, reason: String },
    #[error("The specified region {start}+{length} exceeds the length of the sequence ({template_len})")]
    RegionOverflow {
        start: usize,
        length: usize,
        template_len: usize,
    },
    #[error("Primer sequence is empty")]
    EmptyPrimer,
    #[error("Primer sequence '{0}' contains non-nucleotide characters")]
    InvalidPrimer(String),
    #[error("Primer engine failed: {0}")]
    Engine(String),
}

impl CoreError {
    pub fn range(start: i64, end: i64, reason: impl Into<String>) -> Self {
        CoreError::Range {
            start,
            end,
            reason: reason.into(),
        }
    }
}
