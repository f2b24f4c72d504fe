//! Rich-text document model consumed and produced by the autoformat engine.
//!
//! # Responsibility
//! - Define blocks, inline styles, selections and whole-document values.
//! - Provide the primitive text/style edits the format pipeline composes.
//!
//! # Invariants
//! - A `Document` always holds at least one block.
//! - Offsets are char (Unicode scalar) offsets, `0 <= offset <= block.len()`.
//! - Published documents are never mutated in place; edits produce new values
//!   that share untouched blocks.

pub mod block;
pub mod document;
pub mod selection;
pub mod style;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural validation errors for documents, blocks and selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    EmptyDocument,
    NilBlockKey,
    DuplicateBlockKey(block::BlockKey),
    StyleRangeOutOfBounds {
        key: block::BlockKey,
        start: usize,
        end: usize,
        len: usize,
    },
    UnsortedStyleRanges(block::BlockKey),
    UnknownSelectionBlock(block::BlockKey),
    SelectionOffsetOutOfBounds {
        key: block::BlockKey,
        offset: usize,
        len: usize,
    },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDocument => write!(f, "document must contain at least one block"),
            Self::NilBlockKey => write!(f, "block key must not be nil"),
            Self::DuplicateBlockKey(key) => write!(f, "duplicate block key: {key}"),
            Self::StyleRangeOutOfBounds {
                key,
                start,
                end,
                len,
            } => write!(
                f,
                "style range {start}..{end} out of bounds for block {key} of length {len}"
            ),
            Self::UnsortedStyleRanges(key) => {
                write!(f, "style ranges of block {key} are not sorted by start")
            }
            Self::UnknownSelectionBlock(key) => {
                write!(f, "selection references unknown block: {key}")
            }
            Self::SelectionOffsetOutOfBounds { key, offset, len } => write!(
                f,
                "selection offset {offset} out of bounds for block {key} of length {len}"
            ),
        }
    }
}

impl Error for DocumentValidationError {}
