//! Error types for the analysis engine.
//!
//! Only imports, file loading and index-addressed store mutations can fail.
//! Everything else (expansion, window predicates, formatting) is infallible.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of an index-addressed marker store operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("marker index {index} out of range (len {len})")]
    MarkerIndex { index: usize, len: usize },
    #[error("display position {position} out of range (len {len})")]
    DisplayPosition { position: usize, len: usize },
    #[error("marker frequency must be finite")]
    NonFiniteFrequency,
}

/// Failure while importing a marker CSV. The store is left untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A data row has unusable required fields. `line` is the 1-based data row.
    #[error("invalid numeric values in line {line}: {content}")]
    Validation { line: usize, content: String },
    #[error("marker file has no header line")]
    MissingHeader,
    #[error("marker file contains no data rows")]
    NoRows,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while loading a raw sample file.
#[derive(Debug, Error)]
pub enum SampleFileError {
    #[error("malformed sample line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("sample file contains no data rows")]
    Empty,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Field of a threshold breakpoint row, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdField {
    StartFrequency,
    WarningAmplitude,
    AlertAmplitude,
}

impl std::fmt::Display for ThresholdField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdField::StartFrequency => write!(f, "start frequency"),
            ThresholdField::WarningAmplitude => write!(f, "warning amplitude"),
            ThresholdField::AlertAmplitude => write!(f, "alert amplitude"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    /// `row` is the 1-based row in the editor as entered (before sorting).
    #[error("threshold row {row}: {field} {value:?} is not a number")]
    NotNumeric {
        row: usize,
        field: ThresholdField,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME env var not set")]
    NoHome,
    #[error("config file {path} does not exist")]
    Missing { path: PathBuf },
    #[error("config serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("session serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by [`crate::session::AnalysisSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an import is already in progress")]
    ImportInFlight,
    #[error("base frequency must be positive, got {0}")]
    BaseFrequency(f64),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("marker import failed: {0}")]
    Import(#[from] ImportError),
    #[error("sample load failed: {0}")]
    Samples(#[from] SampleFileError),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}
