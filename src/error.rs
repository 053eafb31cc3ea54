use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TspError {
    #[error("invalid dimension {dim}: {reason}")]
    InvalidDimension { dim: usize, reason: String },
    #[error("could not allocate {what} for {dim} cities: {source}")]
    AllocationFailure {
        what: &'static str,
        dim: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("malformed route: {reason}")]
    MalformedRoute { reason: String },
    #[error("swap indices ({m}, {n}) must satisfy m < n < {dim}")]
    IndexOutOfRange { m: usize, n: usize, dim: usize },
    #[error("instance error at line {line}: {reason}")]
    Instance { line: usize, reason: String },
    #[error("bad configuration value for '{key}': {reason}")]
    Config { key: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type TspResult<T> = std::result::Result<T, TspError>;
