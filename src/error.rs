//! Error types.

use thiserror::Error;

/// Errors raised while validating a predictor configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} uses {bits} index bits (at most {max} are supported)")]
    TableTooLarge { name: &'static str, bits: usize, max: usize },

    #[error("{name} uses {bits} index bits (at least {min} are required)")]
    TableTooSmall { name: &'static str, bits: usize, min: usize },

    #[error("TAGE needs at least one tagged table")]
    NoTables,

    #[error("expected {expected} values for {name}, got {got}")]
    TableCount { name: &'static str, expected: usize, got: usize },

    #[error("tag width of {0} bits exceeds 32 bits")]
    TagTooWide(usize),

    #[error("geometric history ratio must be a finite value above 1 (got {0})")]
    BadRatio(f64),

    #[error("history length {len} for table {table} is not longer than the previous table")]
    HistoryNotIncreasing { table: usize, len: usize },

    #[error("history length {len} exceeds the {width}-bit history register")]
    HistoryTooLong { len: usize, width: usize },

    #[error("{bits}-bit history register is too wide (at most {max} bits are supported)")]
    HistoryTooWide { bits: usize, max: usize },

    #[error("unknown predictor '{0}'")]
    UnknownPredictor(String),

    #[error("invalid number '{0}'")]
    BadNumber(String),

    #[error("wrong number of parameters for '{name}': {got} (expected {expected})")]
    BadArgs { name: String, expected: &'static str, got: usize },
}

/// Errors raised while reading a branch trace.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
}
