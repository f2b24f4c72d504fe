//! Cursor / range selection over a document.

use super::block::BlockKey;

/// Anchor/focus pair naming a block and a char offset each.
///
/// Collapsed when anchor and focus are identical. A selection whose focus
/// precedes its anchor in document order is backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
}

impl Selection {
    /// Cursor at `offset` of block `key`.
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: key,
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
        }
    }

    /// Range inside a single block.
    pub fn within(key: BlockKey, anchor_offset: usize, focus_offset: usize) -> Self {
        Self {
            anchor_key: key,
            anchor_offset,
            focus_key: key,
            focus_offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }
}
