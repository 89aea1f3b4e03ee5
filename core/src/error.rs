//! Error types shared by training, persistence and prediction.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    /// The model artifact does not exist at the configured path.
    #[error("model artifact not found at {}; run `trainer fit` first to create it", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("model artifact at {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("model artifact at {} has format version {found}, expected {expected}; retrain the model", path.display())]
    UnsupportedArtifactVersion { path: PathBuf, found: u32, expected: u32 },

    #[error("dataset not found: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    /// A dataset row could not be parsed. `line` is 1-based.
    #[error("malformed dataset {} at line {line}: {reason}", path.display())]
    DatasetMalformed { path: PathBuf, line: u64, reason: String },

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, PriceError>;

impl PriceError {
    pub fn malformed(path: impl Into<PathBuf>, line: u64, reason: impl Into<String>) -> Self {
        PriceError::DatasetMalformed { path: path.into(), line, reason: reason.into() }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PriceError::ArtifactCorrupt { path: path.into(), reason: reason.into() }
    }
}
