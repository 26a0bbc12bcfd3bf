//! # CRF Weight Layout
//!
//! The encoded corpus stores base offsets into one flat weight vector. A
//! unigram feature owns `n_labels` consecutive weights (one per label), a
//! bigram feature owns `n_labels²` (one per `(previous, current)` pair). The
//! in-database trainer resolves weights with the helpers below, so the
//! layout here is a wire contract.

use serde::{Deserialize, Serialize};

/// Base offset of a feature block in the weight vector.
pub type FeatureId = u64;

/// Which kind of template line produced a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// `U` lines: one weight per label.
    Unigram,
    /// `B` lines: one weight per label pair.
    Bigram,
}

impl FeatureKind {
    /// Number of weights reserved for one feature of this kind.
    pub fn width(self, n_labels: usize) -> FeatureId {
        let n = n_labels as FeatureId;
        match self {
            FeatureKind::Unigram => n,
            FeatureKind::Bigram => n * n,
        }
    }
}

/// Weight index of unigram feature `base` firing with `label`.
pub fn unigram_weight_index(base: FeatureId, label: usize, n_labels: usize) -> Option<FeatureId> {
    (label < n_labels).then(|| base + label as FeatureId)
}

/// Weight index of bigram feature `base` for the transition `prev -> label`.
pub fn bigram_weight_index(
    base: FeatureId,
    prev: usize,
    label: usize,
    n_labels: usize,
) -> Option<FeatureId> {
    if prev >= n_labels || label >= n_labels {
        return None;
    }
    Some(base + (prev * n_labels + label) as FeatureId)
}

/// Model meta data the CRF trainer is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrfParams {
    /// Number of distinct labels.
    pub nlabels: usize,
    /// Number of unigram template lines.
    pub nulines: usize,
    /// Number of bigram template lines.
    pub nblines: usize,
    /// Size of the weight vector.
    pub ndims: FeatureId,
    /// Number of encoded documents.
    pub ntuples: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(FeatureKind::Unigram.width(3), 3);
        assert_eq!(FeatureKind::Bigram.width(3), 9);
        assert_eq!(FeatureKind::Bigram.width(0), 0);
    }

    #[test]
    fn test_unigram_index() {
        assert_eq!(unigram_weight_index(10, 2, 3), Some(12));
        assert_eq!(unigram_weight_index(10, 3, 3), None);
    }

    #[test]
    fn test_bigram_index_stays_in_block() {
        let n = 4;
        let base = 100;
        let width = FeatureKind::Bigram.width(n);
        for prev in 0..n {
            for label in 0..n {
                let idx = bigram_weight_index(base, prev, label, n).unwrap();
                assert!(idx >= base && idx < base + width);
            }
        }
        assert_eq!(bigram_weight_index(base, 1, 2, n), Some(106));
        assert_eq!(bigram_weight_index(base, 4, 0, n), None);
    }

    #[test]
    fn test_params_serialize() {
        let params = CrfParams {
            nlabels: 2,
            nulines: 1,
            nblines: 0,
            ndims: 4,
            ntuples: 1,
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            json,
            r#"{"nlabels":2,"nulines":1,"nblines":0,"ndims":4,"ntuples":1}"#
        );
    }
}
