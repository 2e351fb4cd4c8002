//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing bundle files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read or write failed.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entity document is not valid YAML, or a value cannot be written as YAML.
    #[error("yaml error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A schema document is not valid JSON.
    #[error("json error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record field has no JSON form.
    #[error("field '{field}' in {path} cannot be read as JSON: {source}")]
    Field {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but does not have the expected shape.
    #[error("invalid document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
