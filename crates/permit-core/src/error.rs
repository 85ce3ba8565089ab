//! Errors raised while loading the permit collection

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse permits: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid permit {permit_id}: {reason}")]
    Invalid { permit_id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SourceError>;
