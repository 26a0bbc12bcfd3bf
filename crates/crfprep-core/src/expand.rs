//! # Pattern Expander
//!
//! Turns a compiled template line into a concrete feature identity at one
//! token position. Macros pointing before the first token become
//! `B[rowOffset,col]`, keeping the offset as written in the template. Macros
//! pointing past the last token become `E[row - len,col]`, where `row` is the
//! absolute document row. Real column values are substituted verbatim.

use std::fmt::Write;

use crate::corpus::Document;
use crate::error::{CrfPrepError, Result};
use crate::model::FeatureKind;
use crate::template::{Macro, Segment, Template, TemplateLine};

/// Expand `line` at token `index` of `doc` into `out` (cleared first).
pub fn expand_into(line: &TemplateLine, doc: &Document, index: usize, out: &mut String) -> Result<()> {
    out.clear();
    for segment in line.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Macro(m) => push_macro(*m, doc, index, out)?,
        }
    }
    Ok(())
}

/// Expand `line` at token `index` of `doc`.
pub fn expand(line: &TemplateLine, doc: &Document, index: usize) -> Result<String> {
    let mut out = String::new();
    expand_into(line, doc, index, &mut out)?;
    Ok(out)
}

fn push_macro(m: Macro, doc: &Document, index: usize, out: &mut String) -> Result<()> {
    let len = doc.len() as i64;
    let row = index as i64 + m.row_offset;

    // Writing into a String cannot fail
    if row < 0 {
        let _ = write!(out, "B[{},{}]", m.row_offset, m.col);
    } else if row >= len {
        let _ = write!(out, "E[{},{}]", row - len, m.col);
    } else {
        let token = &doc.tokens()[row as usize];
        let value = token
            .columns
            .get(m.col)
            .ok_or(CrfPrepError::ColumnOutOfRange {
                line: token.line,
                row: row as usize,
                col: m.col,
                available: token.columns.len(),
            })?;
        out.push_str(value);
    }
    Ok(())
}

/// Visit every feature identity of a document in corpus-pass order: tokens
/// in order, and for each token all unigram lines then all bigram lines.
///
/// The dictionary builder and the encoder both walk documents through this
/// function, so the two passes cannot drift apart.
pub fn visit_features<F>(template: &Template, doc: &Document, mut visit: F) -> Result<()>
where
    F: FnMut(FeatureKind, &str) -> Result<()>,
{
    let mut scratch = String::new();
    for index in 0..doc.len() {
        for line in template.lines() {
            expand_into(line, doc, index, &mut scratch)?;
            visit(line.kind(), &scratch)?;
        }
    }
    Ok(())
}
