use std::path::PathBuf;

use imgresize_layout::OverlayMetricsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid script: {message}")]
    InvalidScript { message: String },

    #[error("invalid overlay metrics: {0}")]
    Metrics(#[from] OverlayMetricsError),

    #[error("trace mismatch at step {step}: expected {expected}, got {actual}")]
    TraceMismatch {
        step: u64,
        expected: String,
        actual: String,
    },
}

impl ReplayError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidScript { .. } | Self::Metrics(_) => 2,
            Self::TraceMismatch { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidScript {
            message: message.into(),
        }
    }
}
