pub mod boulder;
pub mod detect;
pub mod export;
pub mod reference;

use primerplan_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Line {line}: cannot parse '{content}'")]
    InvalidLine { line: usize, content: String },
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    GenBank,
    Fasta,
    Embl,
    Raw,
}
