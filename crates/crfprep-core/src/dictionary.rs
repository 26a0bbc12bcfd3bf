//! # Feature Dictionary
//!
//! Maps every distinct feature identity to the base offset of its block in
//! the weight vector. Bases are handed out from one running counter in
//! first-seen order, so blocks never overlap.

use std::collections::HashMap;
use std::io::Write;

use tracing::info;

use crate::corpus::Document;
use crate::error::Result;
use crate::expand::visit_features;
use crate::model::{FeatureId, FeatureKind};
use crate::template::Template;

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub identity: String,
    pub kind: FeatureKind,
    pub base: FeatureId,
}

/// Insertion-ordered feature identity -> base id mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDictionary {
    index: HashMap<String, usize>,
    entries: Vec<FeatureEntry>,
    n_labels: usize,
    total_width: FeatureId,
}

impl FeatureDictionary {
    /// Empty dictionary for a label set of size `n_labels`.
    pub fn new(n_labels: usize) -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            n_labels,
            total_width: 0,
        }
    }

    /// Return the base of `identity`, reserving a new block if unseen.
    pub fn insert(&mut self, identity: &str, kind: FeatureKind) -> FeatureId {
        if let Some(&pos) = self.index.get(identity) {
            return self.entries[pos].base;
        }
        let base = self.total_width;
        self.total_width += kind.width(self.n_labels);
        self.index.insert(identity.to_string(), self.entries.len());
        self.entries.push(FeatureEntry {
            identity: identity.to_string(),
            kind,
            base,
        });
        base
    }

    pub fn get(&self, identity: &str) -> Option<FeatureId> {
        self.index.get(identity).map(|&pos| self.entries[pos].base)
    }

    /// Entry for `identity`, including its kind.
    pub fn entry(&self, identity: &str) -> Option<&FeatureEntry> {
        self.index.get(identity).map(|&pos| &self.entries[pos])
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the weight vector covering every block.
    pub fn total_width(&self) -> FeatureId {
        self.total_width
    }

    /// Entries in insertion (and base) order.
    pub fn entries(&self) -> &[FeatureEntry] {
        &self.entries
    }

    /// Write one `identity<TAB>baseId` line per feature.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "{}\t{}", entry.identity, entry.base)?;
        }
        out.flush()
    }
}

/// Builds a [`FeatureDictionary`] one document at a time.
pub struct DictionaryBuilder<'a> {
    template: &'a Template,
    dictionary: FeatureDictionary,
    documents: usize,
}

impl<'a> DictionaryBuilder<'a> {
    pub fn new(template: &'a Template, n_labels: usize) -> Self {
        Self {
            template,
            dictionary: FeatureDictionary::new(n_labels),
            documents: 0,
        }
    }

    /// Register every feature identity of `doc`.
    pub fn add_document(&mut self, doc: &Document) -> Result<()> {
        let dictionary = &mut self.dictionary;
        visit_features(self.template, doc, |kind, identity| {
            dictionary.insert(identity, kind);
            Ok(())
        })?;
        self.documents += 1;
        Ok(())
    }

    pub fn finish(self) -> FeatureDictionary {
        info!(
            documents = self.documents,
            features = self.dictionary.len(),
            total_width = self.dictionary.total_width(),
            "built feature dictionary"
        );
        self.dictionary
    }
}

/// Build the dictionary over a full corpus pass.
pub fn build<I>(documents: I, template: &Template, n_labels: usize) -> Result<FeatureDictionary>
where
    I: IntoIterator<Item = Result<Document>>,
{
    let mut builder = DictionaryBuilder::new(template, n_labels);
    for doc in documents {
        builder.add_document(&doc?)?;
    }
    Ok(builder.finish())
}
