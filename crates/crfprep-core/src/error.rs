use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing a CRF training corpus.
#[derive(Debug, Error)]
pub enum CrfPrepError {
    /// Reading or writing one of the input/output files failed.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// File associated with the failure, if known.
        path: Option<PathBuf>,
        /// Underlying error from the standard library.
        source: std::io::Error,
    },

    /// A template line has an unknown prefix or a malformed `%x[..]` macro.
    #[error("wrong template file format at line {line}: ^{content} ({reason})")]
    Template {
        /// 1-based line number in the template file.
        line: usize,
        /// The offending line, verbatim.
        content: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A macro addressed a feature column the token does not have.
    #[error(
        "corpus line {line}: column {col} requested at document row {row}, but the token has only {available} feature columns"
    )]
    ColumnOutOfRange {
        /// 1-based corpus line number of the referenced token.
        line: usize,
        /// Row inside the document.
        row: usize,
        /// Requested column.
        col: usize,
        /// Number of feature columns the token actually has.
        available: usize,
    },

    /// The encoder met a label that the registry never saw.
    #[error("label {label:?} is not present in the label dictionary")]
    UnknownLabel {
        /// The unregistered label.
        label: String,
    },

    /// The encoder met a feature identity absent from the dictionary.
    #[error("feature {identity:?} is not present in the feature dictionary")]
    MissingFeature {
        /// The fully expanded identity.
        identity: String,
    },

    /// The macro pattern failed to compile (should not happen with the static pattern).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// An encoded record could not be parsed back.
    #[error("malformed encoded record: {0}")]
    Format(String),

    /// A run summary could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CrfPrepError {
    /// Wraps an IO error, attaching the path it happened on.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }
}

/// Result type alias for crfprep operations.
pub type Result<T> = std::result::Result<T, CrfPrepError>;
