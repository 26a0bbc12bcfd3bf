//! # Document Encoder
//!
//! Re-walks the corpus with a finished dictionary and turns each document
//! into three aligned integer lists:
//!
//! ```text
//! {u1,u2,...}<TAB>{b1,b2,...}<TAB>{l1,l2,...}
//! ```
//!
//! Unigram and bigram lists are token-major, template-line-minor.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use tracing::{info, warn};

use crate::config::MissPolicy;
use crate::corpus::Document;
use crate::dictionary::FeatureDictionary;
use crate::error::{CrfPrepError, Result};
use crate::expand::visit_features;
use crate::labels::{LabelId, LabelRegistry};
use crate::model::FeatureKind;
use crate::template::Template;

/// Emitted in place of a feature id the dictionary does not know.
pub const MISSING_FEATURE: i64 = -1;

/// One encoded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedDocument {
    pub unigram_ids: Vec<i64>,
    pub bigram_ids: Vec<i64>,
    pub label_ids: Vec<LabelId>,
}

impl EncodedDocument {
    /// Token count.
    pub fn len(&self) -> usize {
        self.label_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_ids.is_empty()
    }

    /// Unigram ids of token `t`, given the number of unigram template lines.
    pub fn unigrams_at(&self, t: usize, n_lines: usize) -> Option<&[i64]> {
        token_slice(&self.unigram_ids, t, n_lines)
    }

    /// Bigram ids of token `t`, given the number of bigram template lines.
    pub fn bigrams_at(&self, t: usize, n_lines: usize) -> Option<&[i64]> {
        token_slice(&self.bigram_ids, t, n_lines)
    }
}

fn token_slice(ids: &[i64], t: usize, n_lines: usize) -> Option<&[i64]> {
    let start = t.checked_mul(n_lines)?;
    ids.get(start..start.checked_add(n_lines)?)
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    f.write_str("{")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("}")
}

impl fmt::Display for EncodedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.unigram_ids)?;
        f.write_str("\t")?;
        write_list(f, &self.bigram_ids)?;
        f.write_str("\t")?;
        write_list(f, &self.label_ids)
    }
}

fn parse_list<T: FromStr>(field: &str) -> Result<Vec<T>>
where
    T::Err: fmt::Display,
{
    let inner = field
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| CrfPrepError::Format(format!("expected {{...}}, got {field:?}")))?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| CrfPrepError::Format(format!("bad integer {v:?}: {e}")))
        })
        .collect()
}

impl FromStr for EncodedDocument {
    type Err = CrfPrepError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim_end_matches(['\r', '\n']).split('\t').collect();
        let [unigrams, bigrams, labels] = fields.as_slice() else {
            return Err(CrfPrepError::Format(format!(
                "expected 3 tab-separated fields, got {}",
                fields.len()
            )));
        };
        Ok(Self {
            unigram_ids: parse_list(unigrams)?,
            bigram_ids: parse_list(bigrams)?,
            label_ids: parse_list(labels)?,
        })
    }
}

/// Encodes documents against a label registry and feature dictionary.
pub struct Encoder<'a> {
    labels: &'a LabelRegistry,
    dictionary: &'a FeatureDictionary,
    template: &'a Template,
    policy: MissPolicy,
    misses: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(
        labels: &'a LabelRegistry,
        dictionary: &'a FeatureDictionary,
        template: &'a Template,
    ) -> Self {
        Self {
            labels,
            dictionary,
            template,
            policy: MissPolicy::default(),
            misses: 0,
        }
    }

    /// Set how dictionary misses are handled.
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of dictionary misses seen so far.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Encode a single document.
    pub fn encode_document(&mut self, doc: &Document) -> Result<EncodedDocument> {
        let mut encoded = EncodedDocument {
            unigram_ids: Vec::with_capacity(doc.len() * self.template.unigrams().len()),
            bigram_ids: Vec::with_capacity(doc.len() * self.template.bigrams().len()),
            label_ids: Vec::with_capacity(doc.len()),
        };

        let dictionary = self.dictionary;
        let policy = self.policy;
        let misses = &mut self.misses;
        visit_features(self.template, doc, |kind, identity| {
            let id = match dictionary.get(identity) {
                Some(base) => base as i64,
                None => match policy {
                    MissPolicy::Error => {
                        return Err(CrfPrepError::MissingFeature {
                            identity: identity.to_string(),
                        });
                    }
                    MissPolicy::Sentinel => {
                        *misses += 1;
                        warn!(identity, "feature missing from dictionary, emitting -1");
                        MISSING_FEATURE
                    }
                },
            };
            match kind {
                FeatureKind::Unigram => encoded.unigram_ids.push(id),
                FeatureKind::Bigram => encoded.bigram_ids.push(id),
            }
            Ok(())
        })?;

        for label in doc.labels() {
            let id = self.labels.id(label).ok_or_else(|| CrfPrepError::UnknownLabel {
                label: label.to_string(),
            })?;
            encoded.label_ids.push(id);
        }

        Ok(encoded)
    }

    /// Encode a corpus pass, writing one record per line. Returns the
    /// number of documents written.
    pub fn encode_to<I, W>(&mut self, documents: I, mut out: W) -> Result<usize>
    where
        I: IntoIterator<Item = Result<Document>>,
        W: Write,
    {
        let mut count = 0;
        for doc in documents {
            let encoded = self.encode_document(&doc?)?;
            writeln!(out, "{encoded}").map_err(|e| CrfPrepError::io(e, None))?;
            count += 1;
        }
        out.flush().map_err(|e| CrfPrepError::io(e, None))?;

        if self.misses > 0 {
            warn!(
                misses = self.misses,
                "dictionary does not match corpus; -1 emitted for missing features"
            );
        }
        info!(documents = count, "encoded corpus");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DocumentReader;
    use crate::dictionary::build;
    use crate::template::TemplateParser;
    use std::io::Cursor;

    struct Fixture {
        labels: LabelRegistry,
        dictionary: FeatureDictionary,
        template: Template,
    }

    fn fixture(corpus: &str, template: &str) -> Fixture {
        let labels = LabelRegistry::collect(DocumentReader::new(Cursor::new(corpus))).unwrap();
        let template = TemplateParser::new().unwrap().parse(Cursor::new(template)).unwrap();
        let dictionary = build(
            DocumentReader::new(Cursor::new(corpus)),
            &template,
            labels.len(),
        )
        .unwrap();
        Fixture {
            labels,
            dictionary,
            template,
        }
    }

    fn encode(fx: &Fixture, corpus: &str) -> String {
        let mut out = Vec::new();
        Encoder::new(&fx.labels, &fx.dictionary, &fx.template)
            .encode_to(DocumentReader::new(Cursor::new(corpus)), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_two_token_scenario() {
        let corpus = "Det DT\nNoun NN\n\n";
        let fx = fixture(corpus, "U00:%x[0,0]\n");
        assert_eq!(encode(&fx, corpus), "{0,2}\t{}\t{0,1}\n");
    }

    #[test]
    fn test_bigram_ids() {
        let corpus = "a X\nb Y\n\n";
        let fx = fixture(corpus, "U00:%x[0,0]\nB\n");
        // U00:a -> 0, B -> 2, U00:b -> 6
        assert_eq!(encode(&fx, corpus), "{0,6}\t{2,2}\t{0,1}\n");
    }

    #[test]
    fn test_one_record_per_document() {
        let corpus = "a X\n\nb Y\nc X\n\n";
        let fx = fixture(corpus, "U00:%x[0,0]\n");
        let out = encode(&fx, corpus);
        let records: Vec<_> = out.lines().collect();
        assert_eq!(records, vec!["{0}\t{}\t{0}", "{2,4}\t{}\t{1,0}"]);
    }

    #[test]
    fn test_sentinel_on_miss() {
        let fx = fixture("a X\n\n", "U00:%x[0,0]\n");
        let mut encoder = Encoder::new(&fx.labels, &fx.dictionary, &fx.template);
        let doc = DocumentReader::new(Cursor::new("zzz X\n"))
            .next()
            .unwrap()
            .unwrap();

        let encoded = encoder.encode_document(&doc).unwrap();
        assert_eq!(encoded.unigram_ids, vec![MISSING_FEATURE]);
        assert_eq!(encoder.misses(), 1);
    }

    #[test]
    fn test_error_policy_on_miss() {
        let fx = fixture("a X\n\n", "U00:%x[0,0]\n");
        let mut encoder = Encoder::new(&fx.labels, &fx.dictionary, &fx.template)
            .with_miss_policy(MissPolicy::Error);
        let doc = DocumentReader::new(Cursor::new("zzz X\n"))
            .next()
            .unwrap()
            .unwrap();

        assert!(matches!(
            encoder.encode_document(&doc),
            Err(CrfPrepError::MissingFeature { .. })
        ));
    }

    #[test]
    fn test_unknown_label() {
        let fx = fixture("a X\n\n", "U00:%x[0,0]\n");
        let mut encoder = Encoder::new(&fx.labels, &fx.dictionary, &fx.template);
        let doc = DocumentReader::new(Cursor::new("a Q\n"))
            .next()
            .unwrap()
            .unwrap();

        assert!(matches!(
            encoder.encode_document(&doc),
            Err(CrfPrepError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_record_parses_back() {
        let record: EncodedDocument = "{0,6,-1}\t{}\t{0,1,0}".parse().unwrap();
        assert_eq!(record.unigram_ids, vec![0, 6, -1]);
        assert!(record.bigram_ids.is_empty());
        assert_eq!(record.len(), 3);
        assert_eq!(record.to_string(), "{0,6,-1}\t{}\t{0,1,0}");
    }

    #[test]
    fn test_malformed_record() {
        assert!("{0}\t{}".parse::<EncodedDocument>().is_err());
        assert!("0\t{}\t{0}".parse::<EncodedDocument>().is_err());
        assert!("{x}\t{}\t{0}".parse::<EncodedDocument>().is_err());
    }

    #[test]
    fn test_per_token_slices() {
        let record = EncodedDocument {
            unigram_ids: vec![0, 3, 6, 9],
            bigram_ids: vec![12, 21],
            label_ids: vec![0, 1],
        };
        assert_eq!(record.unigrams_at(1, 2), Some(&[6, 9][..]));
        assert_eq!(record.bigrams_at(0, 1), Some(&[12][..]));
        assert_eq!(record.unigrams_at(2, 2), None);
        assert_eq!(record.bigrams_at(5, 1), None);
    }
}
