use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the data directory. All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Missing data file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid problem id {value:?} in {file}")]
    InvalidId { file: String, value: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
