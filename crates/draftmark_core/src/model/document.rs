//! Whole-document value: ordered blocks plus the active selection.
//!
//! # Responsibility
//! - Hold one immutable document version handed between host and engine.
//! - Share untouched blocks between versions (`Arc` copy-on-write).
//! - Model the host's own keystroke edit (`insert_text`) so the engine can be
//!   driven end to end.
//!
//! # Invariants
//! - At least one block; block keys are unique.
//! - Every method taking `&self` returns a new value; callers never observe a
//!   partially applied edit.

use super::block::{Block, BlockKey, Span};
use super::selection::Selection;
use super::style::StyleSet;
use super::DocumentValidationError;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Arc<Block>>,
    selection: Selection,
    style_override: Option<StyleSet>,
}

impl Document {
    /// Single empty unstyled block with the cursor at offset 0.
    pub fn empty() -> Self {
        let block = Block::new("");
        let selection = Selection::collapsed(block.key, 0);
        Self {
            blocks: vec![Arc::new(block)],
            selection,
            style_override: None,
        }
    }

    /// Builds a validated document.
    ///
    /// When `selection` is `None` the cursor is collapsed at the start of the
    /// first block.
    pub fn from_blocks(
        blocks: Vec<Block>,
        selection: Option<Selection>,
    ) -> Result<Self, DocumentValidationError> {
        let first_key = blocks
            .first()
            .map(|block| block.key)
            .ok_or(DocumentValidationError::EmptyDocument)?;
        let document = Self {
            blocks: blocks.into_iter().map(Arc::new).collect(),
            selection: selection.unwrap_or_else(|| Selection::collapsed(first_key, 0)),
            style_override: None,
        };
        document.validate()?;
        Ok(document)
    }

    /// Convenience constructor: one unstyled block per entry, cursor at the
    /// end of the last block.
    pub fn from_texts<I, S>(texts: I) -> Result<Self, DocumentValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let blocks = texts.into_iter().map(Block::new).collect();
        Ok(Self::from_blocks(blocks, None)?.move_focus_to_end())
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().map(|block| block.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, key: BlockKey) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| block.key == key)
            .map(|block| block.as_ref())
    }

    pub fn block_index(&self, key: BlockKey) -> Option<usize> {
        self.blocks.iter().position(|block| block.key == key)
    }

    pub fn first_block(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Style applied to the next typed chars, when the host has not moved on.
    pub fn style_override(&self) -> Option<&StyleSet> {
        self.style_override.as_ref()
    }

    /// Whether `self` and `other` share the allocation of block `key`.
    pub fn shares_block(&self, other: &Document, key: BlockKey) -> bool {
        let find = |doc: &Document| doc.blocks.iter().find(|block| block.key == key).cloned();
        match (find(self), find(other)) {
            (Some(left), Some(right)) => Arc::ptr_eq(&left, &right),
            _ => false,
        }
    }

    /// Concatenated block texts joined by `separator`.
    pub fn plain_text(&self, separator: char) -> String {
        let mut text = String::new();
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                text.push(separator);
            }
            text.push_str(&block.text);
        }
        text
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        let mut next = self.clone();
        next.selection = selection;
        next
    }

    pub fn with_style_override(&self, style_override: Option<StyleSet>) -> Self {
        let mut next = self.clone();
        next.style_override = style_override;
        next
    }

    /// Collapsed cursor at the end of the last block.
    pub fn end_selection(&self) -> Selection {
        let last = self.last_block();
        Selection::collapsed(last.key, last.len())
    }

    pub fn move_focus_to_end(&self) -> Self {
        self.with_selection(self.end_selection())
    }

    /// Checks that both selection endpoints exist in this document.
    pub fn validate_selection(&self) -> Result<(), DocumentValidationError> {
        for (key, offset) in [
            (self.selection.anchor_key, self.selection.anchor_offset),
            (self.selection.focus_key, self.selection.focus_offset),
        ] {
            let block = self
                .block(key)
                .ok_or(DocumentValidationError::UnknownSelectionBlock(key))?;
            let len = block.len();
            if offset > len {
                return Err(DocumentValidationError::SelectionOffsetOutOfBounds {
                    key,
                    offset,
                    len,
                });
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        if self.blocks.is_empty() {
            return Err(DocumentValidationError::EmptyDocument);
        }

        let mut seen = HashSet::with_capacity(self.blocks.len());
        for block in &self.blocks {
            block.validate()?;
            if !seen.insert(block.key) {
                return Err(DocumentValidationError::DuplicateBlockKey(block.key));
            }
        }

        self.validate_selection()
    }

    /// Selected char range of every block the selection covers, in document
    /// order. A collapsed selection yields one empty span.
    ///
    /// Returns an empty list when the selection is invalid.
    pub fn selected_spans(&self) -> Vec<(BlockKey, Span)> {
        let Some(((start_index, start_offset), (end_index, end_offset))) = self.ordered_bounds()
        else {
            return Vec::new();
        };

        (start_index..=end_index)
            .map(|index| {
                let block = &self.blocks[index];
                let start = if index == start_index {
                    start_offset
                } else {
                    0
                };
                let end = if index == end_index {
                    end_offset
                } else {
                    block.len()
                };
                (block.key, Span::new(start, end))
            })
            .collect()
    }

    /// Style the next typed char receives: the override when present,
    /// otherwise the style of the char before the cursor (or the first char
    /// of the block when the cursor is at its start).
    pub fn current_style(&self) -> StyleSet {
        if let Some(style) = &self.style_override {
            return style.clone();
        }
        let Some(((index, offset), _)) = self.ordered_bounds() else {
            return StyleSet::new();
        };
        let block = &self.blocks[index];
        if offset > 0 {
            block.style_at(offset - 1)
        } else if !block.is_empty() {
            block.style_at(0)
        } else {
            StyleSet::new()
        }
    }

    /// Replaces the selection with `text` typed in the current style.
    ///
    /// This is the edit the host performs before handing the document to the
    /// engine. The style override is consumed and the cursor lands after the
    /// inserted text.
    pub fn insert_text(&self, text: &str) -> Result<Self, DocumentValidationError> {
        self.validate_selection()?;
        let styles = self.current_style();
        let mut next = self.delete_selection();

        let cursor = next.selection;
        if let Some(block) = next.block_mut(cursor.focus_key) {
            block.insert_text(cursor.focus_offset, text, &styles);
        }
        let offset = cursor.focus_offset + text.chars().count();
        next.selection = Selection::collapsed(cursor.focus_key, offset);
        next.style_override = None;
        Ok(next)
    }

    /// Removes the selected text, merging blocks when the selection spans
    /// more than one. The result has a collapsed selection.
    pub fn delete_selection(&self) -> Self {
        let mut next = self.clone();
        let Some(((start_index, start_offset), (end_index, end_offset))) = self.ordered_bounds()
        else {
            return next;
        };
        let start_key = self.blocks[start_index].key;

        if start_index == end_index {
            Arc::make_mut(&mut next.blocks[start_index])
                .delete_range(Span::new(start_offset, end_offset));
        } else {
            let tail = Arc::clone(&self.blocks[end_index]);
            let head = Arc::make_mut(&mut next.blocks[start_index]);
            let head_len = head.len();
            head.delete_range(Span::new(start_offset, head_len));
            head.append_from(&tail, end_offset);
            next.blocks.drain(start_index + 1..=end_index);
        }

        next.selection = Selection::collapsed(start_key, start_offset);
        next
    }

    pub(crate) fn block_mut(&mut self, key: BlockKey) -> Option<&mut Block> {
        self.blocks
            .iter_mut()
            .find(|block| block.key == key)
            .map(Arc::make_mut)
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub(crate) fn set_style_override(&mut self, style_override: Option<StyleSet>) {
        self.style_override = style_override;
    }

    /// `(block index, offset)` of the selection start and end in document
    /// order, or `None` when either endpoint names an unknown block.
    fn ordered_bounds(&self) -> Option<((usize, usize), (usize, usize))> {
        let anchor = (
            self.block_index(self.selection.anchor_key)?,
            self.selection.anchor_offset,
        );
        let focus = (
            self.block_index(self.selection.focus_key)?,
            self.selection.focus_offset,
        );
        Some(if anchor <= focus {
            (anchor, focus)
        } else {
            (focus, anchor)
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
