//! # Corpus Reader
//!
//! Streams a CRF++ style corpus one document at a time. Every pass over the
//! corpus (label collection, dictionary building, encoding) goes through
//! [`DocumentReader`], so all passes see the same documents in the same order.
//!
//! Format: one token per line, whitespace-separated fields, the last field
//! is the label. A blank line ends a document.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::{CrfPrepError, Result};

/// A single labeled token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Feature columns, in file order.
    pub columns: Vec<String>,
    /// The label (last field of the line).
    pub label: String,
    /// 1-based line number in the corpus file.
    pub line: usize,
}

impl Token {
    /// Split a corpus line into columns and label.
    ///
    /// Returns `None` for blank lines.
    pub fn parse(line: &str, line_no: usize) -> Option<Self> {
        let mut fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let label = fields.pop()?;
        Some(Self {
            columns: fields,
            label,
            line: line_no,
        })
    }
}

/// An ordered, non-empty run of tokens between two blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    tokens: Vec<Token>,
}

impl Document {
    /// Build a document from tokens. Callers must not pass an empty vector.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(!tokens.is_empty(), "documents are never empty");
        Self { tokens }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for documents produced by [`DocumentReader`].
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Labels of all tokens, in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.label.as_str())
    }
}

/// Iterator over the documents of a corpus stream.
pub struct DocumentReader<R> {
    lines: Lines<R>,
    path: Option<PathBuf>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> DocumentReader<R> {
    /// Wrap any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            path: None,
            line_no: 0,
            done: false,
        }
    }
}

impl DocumentReader<BufReader<File>> {
    /// Open a corpus file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CrfPrepError::io(e, Some(path.to_path_buf())))?;
        let mut reader = Self::new(BufReader::new(file));
        reader.path = Some(path.to_path_buf());
        Ok(reader)
    }
}

impl<R: BufRead> Iterator for DocumentReader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut tokens = Vec::new();
        loop {
            match self.lines.next() {
                None => {
                    self.done = true;
                    break;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(CrfPrepError::io(e, self.path.clone())));
                }
                Some(Ok(line)) => {
                    self.line_no += 1;
                    match Token::parse(&line, self.line_no) {
                        Some(token) => tokens.push(token),
                        // Runs of blank lines do not create empty documents
                        None if tokens.is_empty() => continue,
                        None => break,
                    }
                }
            }
        }

        // Last document may lack a trailing blank line
        if tokens.is_empty() {
            None
        } else {
            Some(Ok(Document::new(tokens)))
        }
    }
}
