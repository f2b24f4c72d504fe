//! Markdown-trigger autoformat pipeline.
//!
//! # Responsibility
//! - Scan documents for trigger patterns (`scanner`).
//! - Pick the single active trigger per edit (`rules`).
//! - Delete trigger text offset-safely (`rewriter`).
//! - Apply block types, inline styles and colours (`style`).
//! - Orchestrate the above per text-change event (`engine`).
//!
//! # Invariants
//! - Per-edit failures never escape the engine; they degrade to a no-op.

pub mod engine;
pub mod rewriter;
pub mod rules;
pub mod scanner;
pub mod style;

use crate::model::block::BlockKey;
use crate::model::DocumentValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised inside the format pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A rule pattern is unusable. Only possible for a broken rule table.
    PatternEngineFailure(String),
    UnknownBlock(BlockKey),
    SpanOutOfBounds {
        key: BlockKey,
        start: usize,
        end: usize,
        len: usize,
    },
    OverlappingSpans(BlockKey),
    InvalidSelection(DocumentValidationError),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatternEngineFailure(message) => write!(f, "pattern engine failure: {message}"),
            Self::UnknownBlock(key) => write!(f, "span references unknown block: {key}"),
            Self::SpanOutOfBounds {
                key,
                start,
                end,
                len,
            } => write!(
                f,
                "span {start}..{end} out of bounds for block {key} of length {len}"
            ),
            Self::OverlappingSpans(key) => write!(f, "overlapping spans in block {key}"),
            Self::InvalidSelection(err) => write!(f, "invalid selection: {err}"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSelection(err) => Some(err),
            _ => None,
        }
    }
}
