use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Run-level failures. Anything here aborts the current command.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Duplicate game id: {0}")]
    DuplicateGameId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Artifact(e.to_string())
    }
}

/// Per-record failures. These are recovered locally and tallied in the run
/// diagnostics; they never abort a batch.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error("Malformed record #{index}: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("Missing closing {line} line for {game_id}")]
    MissingClosingLine { game_id: String, line: String },

    #[error("No prediction available for {game_id}")]
    MissingPrediction { game_id: String },
}

/// Failures of an external data lookup (weather, injuries, strength).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider timed out after {0} ms")]
    Timeout(u64),

    #[error("No data: {0}")]
    NotFound(String),
}
