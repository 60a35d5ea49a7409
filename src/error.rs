use thiserror::Error;

/// Errors surfaced while constructing an `Application` from an external manifest.
/// Algorithm-level infeasibility is never modeled as an `Error` — it is always
/// returned as data on an `AlgorithmResult`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse application configuration JSON: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Invalid application configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
