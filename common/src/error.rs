use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the mapping and listing files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed mapping in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode mapping: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to stat {path}: {source}")]
    Stat { path: PathBuf, source: io::Error },
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// A publish step that could not be run or exited unsuccessfully.
///
/// `step` is a short label such as `git push`; it never carries the credential.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("`{step}` could not be started: {source}")]
    Spawn { step: String, source: io::Error },
    #[error("`{step}` exited with {status}")]
    Status { step: String, status: String },
}
