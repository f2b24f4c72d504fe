//! Trigger pattern matching over block text.
//!
//! # Responsibility
//! - Find every non-overlapping match of a trigger pattern, left to right.
//! - Report matches as char-offset spans, per block and document-wide.
//!
//! # Invariants
//! - `scan` always terminates; a zero-width match advances one char.
//! - Document-wide results keep block order, then left-to-right order.

use crate::model::block::{BlockKey, Span};
use crate::model::document::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static ASTERISK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*+\s").expect("valid asterisk run regex"));

/// Pattern capability used by trigger rules.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact literal text, e.g. `"# "`.
    Literal(&'static str),
    /// Exactly `count` consecutive `*` not adjacent to a further `*`, followed
    /// by one whitespace char.
    AsteriskRun { count: usize },
    /// Arbitrary compiled pattern.
    Pattern(Regex),
}

impl Matcher {
    /// Compiles an arbitrary pattern matcher.
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self::Pattern)
    }

    /// Byte range of the first match starting at or after byte `from`.
    pub fn find_at(&self, text: &str, from: usize) -> Option<Range<usize>> {
        match self {
            Self::Literal(literal) => text
                .get(from..)?
                .find(literal)
                .map(|start| from + start..from + start + literal.len()),
            Self::AsteriskRun { count } => {
                let mut position = from;
                while let Some(found) = ASTERISK_RUN_RE.find_at(text, position) {
                    position = found.end();
                    // `from` may land inside a run; only a run's first `*` counts.
                    if text[..found.start()].ends_with('*') {
                        continue;
                    }
                    let run = found
                        .as_str()
                        .bytes()
                        .take_while(|byte| *byte == b'*')
                        .count();
                    if run == *count {
                        return Some(found.range());
                    }
                }
                None
            }
            Self::Pattern(regex) => regex.find_at(text, from).map(|found| found.range()),
        }
    }

    /// Returns whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.find_at(text, 0).is_some()
    }
}

/// Every non-overlapping match of `matcher` in `text`, as char spans.
pub fn scan(text: &str, matcher: &Matcher) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut position = 0;

    while position <= text.len() {
        let Some(found) = matcher.find_at(text, position) else {
            break;
        };

        spans.push(Span::new(
            char_offset(text, found.start),
            char_offset(text, found.end),
        ));

        position = if found.is_empty() {
            match text[found.end..].chars().next() {
                Some(next) => found.end + next.len_utf8(),
                None => break,
            }
        } else {
            found.end
        };
    }

    spans
}

/// Match span tagged with the block it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSpan {
    pub key: BlockKey,
    pub span: Span,
}

/// Runs [`scan`] over every block in document order and flattens the result.
pub fn scan_document(document: &Document, matcher: &Matcher) -> Vec<DocumentSpan> {
    document
        .blocks()
        .flat_map(|block| {
            scan(&block.text, matcher)
                .into_iter()
                .map(move |span| DocumentSpan {
                    key: block.key,
                    span,
                })
        })
        .collect()
}

fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}
