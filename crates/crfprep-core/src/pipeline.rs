//! # Preparation Pipeline
//!
//! Runs the three corpus passes in order and writes the three artifacts the
//! trainer loads:
//!
//! 1. collect labels, write the label dictionary;
//! 2. parse the template and build the feature dictionary, write it;
//! 3. encode every document into the data file.
//!
//! The corpus is streamed each time; only the two dictionaries stay in memory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PipelineConfig;
use crate::corpus::DocumentReader;
use crate::dictionary::{self, FeatureDictionary};
use crate::encoder::Encoder;
use crate::error::{CrfPrepError, Result};
use crate::labels::LabelRegistry;
use crate::model::{CrfParams, FeatureId};
use crate::template::{Template, TemplateParser};

/// Figures reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub n_labels: usize,
    /// Distinct feature identities.
    pub n_features: usize,
    pub n_unigram_lines: usize,
    pub n_bigram_lines: usize,
    /// Weight vector size.
    pub total_width: FeatureId,
    pub n_documents: usize,
    /// Encoder dictionary misses (always 0 for a self-consistent run).
    pub n_misses: usize,
}

impl RunSummary {
    /// Trainer meta data for this corpus.
    pub fn crf_params(&self) -> CrfParams {
        CrfParams {
            nlabels: self.n_labels,
            nulines: self.n_unigram_lines,
            nblines: self.n_bigram_lines,
            ndims: self.total_width,
            ntuples: self.n_documents,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Everything a run produced, kept in memory.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub labels: LabelRegistry,
    pub template: Template,
    pub dictionary: FeatureDictionary,
    pub summary: RunSummary,
}

/// One corpus preparation run.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run all passes and return the summary.
    pub fn run(&self) -> Result<RunSummary> {
        self.run_with_artifacts().map(|artifacts| artifacts.summary)
    }

    /// Run all passes, keeping the dictionaries for the caller.
    pub fn run_with_artifacts(&self) -> Result<Artifacts> {
        let cfg = &self.config;

        let labels = LabelRegistry::collect(DocumentReader::open(&cfg.corpus)?)?;
        write_file(&cfg.label_output, |out| labels.write_to(out))?;
        info!(labels = labels.len(), path = ?cfg.label_output, "wrote label dictionary");

        let template = TemplateParser::new()?.parse_file(&cfg.template)?;

        let dictionary =
            dictionary::build(DocumentReader::open(&cfg.corpus)?, &template, labels.len())?;
        write_file(&cfg.feature_output, |out| dictionary.write_to(out))?;
        info!(
            features = dictionary.len(),
            total_width = dictionary.total_width(),
            path = ?cfg.feature_output,
            "wrote feature dictionary"
        );

        let mut encoder =
            Encoder::new(&labels, &dictionary, &template).with_miss_policy(cfg.miss_policy);
        let out = create(&cfg.encoded_output)?;
        let n_documents = encoder
            .encode_to(DocumentReader::open(&cfg.corpus)?, out)
            .map_err(|err| attach_path(err, &cfg.encoded_output))?;
        let n_misses = encoder.misses();
        info!(documents = n_documents, path = ?cfg.encoded_output, "wrote encoded data");

        let summary = RunSummary {
            n_labels: labels.len(),
            n_features: dictionary.len(),
            n_unigram_lines: template.unigrams().len(),
            n_bigram_lines: template.bigrams().len(),
            total_width: dictionary.total_width(),
            n_documents,
            n_misses,
        };

        Ok(Artifacts {
            labels,
            template,
            dictionary,
            summary,
        })
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| CrfPrepError::io(e, Some(path.to_path_buf())))
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let mut out = create(path)?;
    write(&mut out).map_err(|e| CrfPrepError::io(e, Some(path.to_path_buf())))
}

fn attach_path(err: CrfPrepError, path: &Path) -> CrfPrepError {
    match err {
        CrfPrepError::Io { path: None, source } => CrfPrepError::io(source, Some(path.to_path_buf())),
        other => other,
    }
}
