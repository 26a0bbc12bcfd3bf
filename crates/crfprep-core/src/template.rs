//! # Template Parser
//!
//! Reads a CRF++ style feature template. Each `U` or `B` line is compiled
//! into literal text and `%x[row,col]` macros once, up front, so expansion
//! never re-scans the pattern.
//!
//! ```text
//! # unigram
//! U00:%x[-1,0]
//! U01:%x[0,0]/%x[1,0]
//! # bigram
//! B
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{CrfPrepError, Result};
use crate::model::FeatureKind;

/// `%x[rowOffset,col]` reference to a neighbouring token's column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macro {
    /// Position relative to the current token.
    pub row_offset: i64,
    /// Feature column index.
    pub col: usize,
}

/// Piece of a compiled template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Macro(Macro),
}

/// A compiled `U`/`B` template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLine {
    text: String,
    kind: FeatureKind,
    segments: Vec<Segment>,
}

impl TemplateLine {
    /// Original line text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterate over the macros of this line, left to right.
    pub fn macros(&self) -> impl Iterator<Item = Macro> + '_ {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Macro(m) => Some(*m),
            Segment::Literal(_) => None,
        })
    }
}

/// Parsed template: unigram and bigram lines, each in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    unigrams: Vec<TemplateLine>,
    bigrams: Vec<TemplateLine>,
}

impl Template {
    pub fn unigrams(&self) -> &[TemplateLine] {
        &self.unigrams
    }

    pub fn bigrams(&self) -> &[TemplateLine] {
        &self.bigrams
    }

    /// Unigram lines first, then bigram lines. This is the per-token
    /// visiting order used by every corpus pass.
    pub fn lines(&self) -> impl Iterator<Item = &TemplateLine> {
        self.unigrams.iter().chain(self.bigrams.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.unigrams.is_empty() && self.bigrams.is_empty()
    }
}

/// Template parser holding the pre-compiled macro pattern.
pub struct TemplateParser {
    re_macro: Regex,
}

const MACRO_OPEN: &str = "%x[";

impl TemplateParser {
    /// Constructs a parser.
    ///
    /// # Errors
    ///
    /// Returns `CrfPrepError::Regex` if the macro pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_macro: Regex::new(r"%x\[(-?\d+),(\d+)\]")?,
        })
    }

    /// Parse a whole template stream.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Template> {
        let mut template = Template::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| CrfPrepError::io(e, None))?;
            if let Some(compiled) = self.parse_line(&line, idx + 1)? {
                debug!(line = idx + 1, pattern = compiled.text(), kind = ?compiled.kind(), "template line");
                match compiled.kind() {
                    FeatureKind::Unigram => template.unigrams.push(compiled),
                    FeatureKind::Bigram => template.bigrams.push(compiled),
                }
            }
        }

        if template.is_empty() {
            warn!("template has no unigram or bigram lines");
        }
        info!(
            unigram_lines = template.unigrams.len(),
            bigram_lines = template.bigrams.len(),
            "parsed template"
        );
        Ok(template)
    }

    /// Parse a template file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Template> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CrfPrepError::io(e, Some(path.to_path_buf())))?;
        self.parse(BufReader::new(file)).map_err(|err| match err {
            CrfPrepError::Io { path: None, source } => {
                CrfPrepError::io(source, Some(path.to_path_buf()))
            }
            other => other,
        })
    }

    /// Compile one line. Comments and blank lines yield `None`.
    pub fn parse_line(&self, line: &str, line_no: usize) -> Result<Option<TemplateLine>> {
        let text = line.trim_end_matches('\r');
        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }

        let kind = match text.chars().next() {
            Some('U') => FeatureKind::Unigram,
            Some('B') => FeatureKind::Bigram,
            _ => {
                return Err(template_error(
                    text,
                    line_no,
                    "line must start with U, B or #",
                ));
            }
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in self.re_macro.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_literal(&mut segments, &text[last..whole.start()], text, line_no)?;

            let row_offset = caps[1]
                .parse::<i64>()
                .map_err(|e| template_error(text, line_no, &format!("bad row offset: {e}")))?;
            let col = caps[2]
                .parse::<usize>()
                .map_err(|e| template_error(text, line_no, &format!("bad column: {e}")))?;
            segments.push(Segment::Macro(Macro { row_offset, col }));
            last = whole.end();
        }
        push_literal(&mut segments, &text[last..], text, line_no)?;

        Ok(Some(TemplateLine {
            text: text.to_string(),
            kind,
            segments,
        }))
    }
}

fn push_literal(
    segments: &mut Vec<Segment>,
    literal: &str,
    text: &str,
    line_no: usize,
) -> Result<()> {
    // Anything that opens a macro but did not match the pattern is malformed
    if literal.contains(MACRO_OPEN) {
        return Err(template_error(text, line_no, "malformed %x[row,col] macro"));
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal.to_string()));
    }
    Ok(())
}

fn template_error(text: &str, line_no: usize, reason: &str) -> CrfPrepError {
    CrfPrepError::Template {
        line: line_no,
        content: text.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &str) -> Result<Template> {
        TemplateParser::new().unwrap().parse(Cursor::new(input))
    }

    #[test]
    fn test_split_by_kind() {
        let template = parse("# comment\nU00:%x[0,0]\n\nB\nU01:%x[-1,0]\nB01:%x[0,1]\n").unwrap();

        let uni: Vec<_> = template.unigrams().iter().map(|l| l.text()).collect();
        let bi: Vec<_> = template.bigrams().iter().map(|l| l.text()).collect();
        assert_eq!(uni, vec!["U00:%x[0,0]", "U01:%x[-1,0]"]);
        assert_eq!(bi, vec!["B", "B01:%x[0,1]"]);
    }

    #[test]
    fn test_lines_order() {
        let template = parse("B\nU00:%x[0,0]\n").unwrap();
        let order: Vec<_> = template.lines().map(|l| l.kind()).collect();
        assert_eq!(order, vec![FeatureKind::Unigram, FeatureKind::Bigram]);
    }

    #[test]
    fn test_compiled_segments() {
        let parser = TemplateParser::new().unwrap();
        let line = parser
            .parse_line("U05:%x[-1,0]/%x[0,0]", 1)
            .unwrap()
            .unwrap();

        assert_eq!(
            line.segments(),
            &[
                Segment::Literal("U05:".into()),
                Segment::Macro(Macro { row_offset: -1, col: 0 }),
                Segment::Literal("/".into()),
                Segment::Macro(Macro { row_offset: 0, col: 0 }),
            ]
        );
        assert_eq!(line.macros().count(), 2);
    }

    #[test]
    fn test_line_without_macros() {
        let parser = TemplateParser::new().unwrap();
        let line = parser.parse_line("B", 1).unwrap().unwrap();
        assert_eq!(line.segments(), &[Segment::Literal("B".into())]);
    }

    #[test]
    fn test_comments_and_blanks_are_skipped() {
        let parser = TemplateParser::new().unwrap();
        assert!(parser.parse_line("# U00:%x[0,0]", 1).unwrap().is_none());
        assert!(parser.parse_line("", 2).unwrap().is_none());
    }

    #[test]
    fn test_wrong_prefix() {
        let err = parse("U00:%x[0,0]\nX00:%x[0,0]\n").unwrap_err();
        match err {
            CrfPrepError::Template { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "X00:%x[0,0]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whitespace_only_line_is_rejected() {
        assert!(matches!(
            parse("U00:%x[0,0]\n  \n"),
            Err(CrfPrepError::Template { line: 2, .. })
        ));
        assert!(parse("U00:%x[0,0]\r\n\r\nB\r\n").is_ok());
    }

    #[test]
    fn test_malformed_macro() {
        assert!(matches!(
            parse("U00:%x[0;0]\n"),
            Err(CrfPrepError::Template { .. })
        ));
        assert!(matches!(
            parse("U00:%x[-1,-2]\n"),
            Err(CrfPrepError::Template { .. })
        ));
    }

    #[test]
    fn test_row_offset_overflow() {
        assert!(matches!(
            parse("U00:%x[99999999999999999999,0]\n"),
            Err(CrfPrepError::Template { .. })
        ));
    }
}
