//! # Label Registry
//!
//! Dense label ids in first-seen order.

use std::collections::HashMap;
use std::io::Write;

use tracing::info;

use crate::corpus::Document;
use crate::error::Result;

/// Integer id of a label.
pub type LabelId = u32;

/// Insertion-ordered mapping from label string to dense id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRegistry {
    ids: HashMap<String, LabelId>,
    labels: Vec<String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every label of a corpus in one pass.
    pub fn collect<I>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        let mut registry = Self::new();
        for doc in documents {
            for label in doc?.labels() {
                registry.insert(label);
            }
        }
        info!(labels = registry.len(), "collected label set");
        Ok(registry)
    }

    /// Register `label` if unseen and return its id.
    pub fn insert(&mut self, label: &str) -> LabelId {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.labels.len() as LabelId;
        self.ids.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        id
    }

    pub fn id(&self, label: &str) -> Option<LabelId> {
        self.ids.get(label).copied()
    }

    /// Reverse lookup.
    pub fn label(&self, id: LabelId) -> Option<&str> {
        self.labels.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, LabelId)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(id, label)| (label.as_str(), id as LabelId))
    }

    /// Write one `label<TAB>id` line per label.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for (label, id) in self.iter() {
            writeln!(out, "{label}\t{id}")?;
        }
        out.flush()
    }
}
