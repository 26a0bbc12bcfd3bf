//! `crfprep` — prepare a CRF++ style corpus for in-database CRF training.
//!
//! ```text
//! crfprep <corpus> <template> <label-dict-out> <feature-dict-out> <encoded-out>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crfprep_core::{Pipeline, PipelineConfig, RunSummary};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "crfprep")]
#[command(about = "Expand a feature template over a CRF++ corpus and encode it for training")]
struct Cli {
    /// CRF++ format training file (one token per line, blank line between documents)
    corpus: PathBuf,

    /// Feature template file (U/B lines with %x[row,col] macros)
    template: PathBuf,

    /// Label dictionary output (label<TAB>id)
    label_output: PathBuf,

    /// Feature dictionary output (identity<TAB>baseId)
    feature_output: PathBuf,

    /// Encoded data output, one {unigrams}<TAB>{bigrams}<TAB>{labels} line per document
    encoded_output: PathBuf,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        PipelineConfig::new()
            .with_corpus(self.corpus)
            .with_template(self.template)
            .with_label_output(self.label_output)
            .with_feature_output(self.feature_output)
            .with_encoded_output(self.encoded_output)
    }
}

fn report(summary: &RunSummary) -> Result<()> {
    println!("Number of labels: {}", summary.n_labels);
    println!("Number of features: {}", summary.total_width);
    println!("Number of documents: {}", summary.n_documents);
    let params = serde_json::to_string(&summary.crf_params())
        .context("failed to serialize training parameters")?;
    println!("{params}");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config();
    let corpus = config.corpus.clone();
    let summary = Pipeline::new(config)
        .run()
        .with_context(|| format!("failed to prepare {}", corpus.display()))?;
    report(&summary)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    // Usage errors exit with status 2 from clap
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
