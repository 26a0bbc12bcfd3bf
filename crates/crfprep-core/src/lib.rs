//! # crfprep Core
//!
//! Prepares CRF++ style sequence-labeling corpora for in-database CRF
//! training. A feature template of `%x[row,col]` macros is expanded at every
//! token, each distinct expansion gets a block of the weight vector, and each
//! document is re-emitted as three aligned integer lists.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use crfprep_core::{DocumentReader, Encoder, LabelRegistry, TemplateParser, dictionary};
//!
//! let corpus = "Det DT\nNoun NN\n\n";
//! let labels = LabelRegistry::collect(DocumentReader::new(Cursor::new(corpus))).unwrap();
//! let template = TemplateParser::new().unwrap().parse(Cursor::new("U00:%x[0,0]\n")).unwrap();
//! let dict = dictionary::build(DocumentReader::new(Cursor::new(corpus)), &template, labels.len()).unwrap();
//!
//! let mut out = Vec::new();
//! Encoder::new(&labels, &dict, &template)
//!     .encode_to(DocumentReader::new(Cursor::new(corpus)), &mut out)
//!     .unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "{0,2}\t{}\t{0,1}\n");
//! ```
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod encoder;
pub mod error;
pub mod expand;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod template;

// Re-export primary API
pub use config::{MissPolicy, PipelineConfig};
pub use corpus::{Document, DocumentReader, Token};
pub use dictionary::{DictionaryBuilder, FeatureDictionary, FeatureEntry};
pub use encoder::{EncodedDocument, Encoder, MISSING_FEATURE};
pub use error::{CrfPrepError, Result};
pub use expand::{expand, expand_into, visit_features};
pub use labels::{LabelId, LabelRegistry};
pub use model::{CrfParams, FeatureId, FeatureKind, bigram_weight_index, unigram_weight_index};
pub use pipeline::{Artifacts, Pipeline, RunSummary};
pub use template::{Macro, Segment, Template, TemplateLine, TemplateParser};
