//! Offset-safe deletion of matched trigger spans.
//!
//! # Responsibility
//! - Delete every span matched for the winning rule.
//! - Keep the document selection valid after the text shrinks.
//!
//! # Invariants
//! - Within a block, spans are deleted rightmost first, so offsets computed
//!   on the pre-edit text stay correct for every remaining deletion.
//! - Spans are checked before any deletion; a rejected rewrite leaves the
//!   input document untouched.

use super::scanner::DocumentSpan;
use super::{FormatError, FormatResult};
use crate::model::block::{BlockKey, Span};
use crate::model::document::Document;
use crate::model::selection::Selection;
use std::collections::BTreeMap;

/// Result of a rewrite: the new document and the blocks that changed.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub document: Document,
    /// Keys of edited blocks, in document order.
    pub touched: Vec<BlockKey>,
}

/// Deletes every span in `spans` from `document`.
///
/// # Errors
/// - `UnknownBlock` when a span names a block the document does not hold.
/// - `SpanOutOfBounds` when a span is inverted or exceeds its block.
/// - `OverlappingSpans` when two spans of one block overlap.
pub fn rewrite(document: &Document, spans: &[DocumentSpan]) -> FormatResult<Rewrite> {
    let mut by_block: BTreeMap<usize, (BlockKey, Vec<Span>)> = BTreeMap::new();
    for found in spans {
        let index = document
            .block_index(found.key)
            .ok_or(FormatError::UnknownBlock(found.key))?;
        by_block
            .entry(index)
            .or_insert_with(|| (found.key, Vec::new()))
            .1
            .push(found.span);
    }

    for (key, block_spans) in by_block.values_mut() {
        let len = document.block(*key).map_or(0, |block| block.len());
        block_spans.sort_by(|left, right| right.start.cmp(&left.start));
        for span in block_spans.iter() {
            if span.start > span.end || span.end > len {
                return Err(FormatError::SpanOutOfBounds {
                    key: *key,
                    start: span.start,
                    end: span.end,
                    len,
                });
            }
        }
        for pair in block_spans.windows(2) {
            // Descending order: pair[1] lies left of pair[0].
            if pair[1].end > pair[0].start {
                return Err(FormatError::OverlappingSpans(*key));
            }
        }
    }

    let mut next = document.clone();
    let mut selection = *document.selection();
    let mut touched = Vec::with_capacity(by_block.len());

    for (key, block_spans) in by_block.into_values() {
        if let Some(block) = next.block_mut(key) {
            for span in &block_spans {
                block.delete_range(*span);
            }
        }
        selection = remap_selection(selection, key, &block_spans);
        touched.push(key);
    }

    next.set_selection(selection);
    Ok(Rewrite {
        document: next,
        touched,
    })
}

/// Shifts selection endpoints in block `key` past the deleted `spans`
/// (given in descending order).
fn remap_selection(selection: Selection, key: BlockKey, spans: &[Span]) -> Selection {
    let remap = |offset: usize| {
        spans.iter().fold(offset, |offset, span| {
            if offset <= span.start {
                offset
            } else if offset >= span.end {
                offset - span.len()
            } else {
                span.start
            }
        })
    };

    let mut next = selection;
    if next.anchor_key == key {
        next.anchor_offset = remap(next.anchor_offset);
    }
    if next.focus_key == key {
        next.focus_offset = remap(next.focus_offset);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::rewrite;
    use crate::format::scanner::{scan_document, DocumentSpan, Matcher};
    use crate::format::FormatError;
    use crate::model::block::{Block, Span};
    use crate::model::document::Document;

    #[test]
    fn deletes_multiple_spans_in_one_block() {
        let document = Document::from_texts(["a* b* c"]).unwrap();
        let spans = scan_document(&document, &Matcher::AsteriskRun { count: 1 });
        assert_eq!(spans.len(), 2);

        let result = rewrite(&document, &spans).unwrap();
        assert_eq!(result.document.first_block().text, "abc");
        assert_eq!(result.document.first_block().len(), "a* b* c".len() - 4);
        assert_eq!(result.touched, vec![document.first_block().key]);
    }

    #[test]
    fn left_to_right_order_in_input_is_irrelevant() {
        let document = Document::from_texts(["x# y# z# "]).unwrap();
        let mut spans = scan_document(&document, &Matcher::Literal("# "));
        spans.reverse();
        spans.rotate_left(1);

        let result = rewrite(&document, &spans).unwrap();
        assert_eq!(result.document.first_block().text, "xyz");
    }

    #[test]
    fn selection_is_remapped_past_deletions() {
        let document = Document::from_texts(["ab* cd* "]).unwrap();
        assert_eq!(document.selection().focus_offset, 8);

        let spans = scan_document(&document, &Matcher::AsteriskRun { count: 1 });
        let result = rewrite(&document, &spans).unwrap();
        assert_eq!(result.document.first_block().text, "abcd");
        assert_eq!(result.document.selection().focus_offset, 4);
        assert!(result.document.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_bounds_span_without_editing() {
        let document = Document::from_texts(["abc"]).unwrap();
        let key = document.first_block().key;
        let spans = [DocumentSpan {
            key,
            span: Span::new(2, 9),
        }];

        let err = rewrite(&document, &spans).unwrap_err();
        assert!(matches!(err, FormatError::SpanOutOfBounds { .. }));
    }

    #[test]
    fn rejects_unknown_block_and_overlaps() {
        let document = Document::from_texts(["abcdef"]).unwrap();
        let stray = Block::new("").key;
        let err = rewrite(
            &document,
            &[DocumentSpan {
                key: stray,
                span: Span::new(0, 1),
            }],
        )
        .unwrap_err();
        assert_eq!(err, FormatError::UnknownBlock(stray));

        let key = document.first_block().key;
        let overlapping = [
            DocumentSpan {
                key,
                span: Span::new(0, 3),
            },
            DocumentSpan {
                key,
                span: Span::new(2, 4),
            },
        ];
        assert_eq!(
            rewrite(&document, &overlapping).unwrap_err(),
            FormatError::OverlappingSpans(key)
        );
    }

    #[test]
    fn untouched_blocks_keep_their_allocation() {
        let document = Document::from_texts(["plain", "bold* "]).unwrap();
        let spans = scan_document(&document, &Matcher::AsteriskRun { count: 1 });

        let result = rewrite(&document, &spans).unwrap();
        let plain = document.first_block().key;
        assert!(result.document.shares_block(&document, plain));
        assert_eq!(result.document.last_block().text, "bold");
    }
}
