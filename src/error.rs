//! Crate-wide error type.

use std::path::PathBuf;

/// Errors produced by the `dcsite` library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A table column requested by a criterion or model does not exist.
    #[error("missing attribute `{attribute}` in site table")]
    MissingAttribute { attribute: String },

    /// A site name was referenced that is not part of the table or model.
    #[error("unknown site `{0}`")]
    UnknownSite(String),

    /// A scoring criterion is malformed (negative or non-finite weight, empty set).
    #[error("invalid criterion: {0}")]
    InvalidCriterion(String),

    /// Input vectors or matrices have incompatible shapes.
    #[error("dimension mismatch: expected {expected}, got {actual} ({context})")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        context: &'static str,
    },

    /// A numeric input is outside its valid domain.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// A selection model failed validation.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// No assignment satisfies the model constraints.
    #[error("model `{0}` is infeasible")]
    Infeasible(String),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An HTML page did not have the expected structure.
    #[error("unexpected page structure at {url}: {reason}")]
    PageStructure { url: String, reason: String },

    /// All fetch attempts for a URL failed.
    #[error("giving up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: usize },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
