use std::path::PathBuf;

use thiserror::Error;

/// Problems with the run parameters, all detected before any computation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read parameter file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse parameter file {path}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cell count must be positive")]
    NoCells,
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("pulse width must be between 1 and {cell_num} cells, got {width}")]
    PulseWidth { width: usize, cell_num: usize },
}

/// Failure of the output sink.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error")]
    Csv(#[from] csv::Error),
    #[error("failed to write metadata")]
    Json(#[from] serde_json::Error),
    #[error("field has {actual} cells, expected {expected}")]
    FieldLength { expected: usize, actual: usize },
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },
}
