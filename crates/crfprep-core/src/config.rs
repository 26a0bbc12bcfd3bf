//! Pipeline configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the encoder does with a feature identity missing from the dictionary.
///
/// A dictionary built from the same corpus always contains every identity,
/// so a miss means the dictionary and corpus do not belong together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissPolicy {
    /// Emit `-1` and log a warning.
    #[default]
    Sentinel,
    /// Abort with `CrfPrepError::MissingFeature`.
    Error,
}

/// Input and output locations of one preparation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CRF++ style training corpus.
    pub corpus: PathBuf,
    /// Feature template.
    pub template: PathBuf,
    /// Label dictionary output (`label<TAB>id`).
    pub label_output: PathBuf,
    /// Feature dictionary output (`identity<TAB>baseId`).
    pub feature_output: PathBuf,
    /// Encoded documents output.
    pub encoded_output: PathBuf,
    /// Handling of encoder dictionary misses
    pub miss_policy: MissPolicy,
}

impl PipelineConfig {
    /// Create a configuration with empty paths and default policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corpus(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus = path.into();
        self
    }

    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = path.into();
        self
    }

    pub fn with_label_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.label_output = path.into();
        self
    }

    pub fn with_feature_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.feature_output = path.into();
        self
    }

    pub fn with_encoded_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoded_output = path.into();
        self
    }

    /// Set how encoder dictionary misses are handled.
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }
}
