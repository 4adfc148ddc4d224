//! Errors for the fallible edges of the crate
//!
//! The simulation itself never fails: no path, no legal move and collisions
//! are all ordinary outcomes. Only loading and validating external data can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DroneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}

pub type DroneResult<T> = Result<T, DroneError>;
