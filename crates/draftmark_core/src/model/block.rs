//! Block model: one paragraph-like unit with its own type, text and styles.
//!
//! # Responsibility
//! - Own the text and inline style ranges of a single block.
//! - Provide offset-correct delete/insert/restyle primitives.
//!
//! # Invariants
//! - `key` is stable and never nil.
//! - `style_ranges` are sorted by `start` and satisfy
//!   `0 <= start <= end <= len()`. Ranges may overlap; the style of one char
//!   is the union of every range covering it.
//! - Offsets count chars, not bytes.

use super::style::{BlockType, InlineStyle, StyleSet};
use super::DocumentValidationError;
use uuid::Uuid;

/// Opaque unique identifier of a block.
pub type BlockKey = Uuid;

/// Half-open `[start, end)` char range within one block's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inline styles covering `[start, end)` of a block's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    pub styles: StyleSet,
}

impl StyleRange {
    pub fn new(start: usize, end: usize, styles: StyleSet) -> Self {
        Self { start, end, styles }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub key: BlockKey,
    pub block_type: BlockType,
    pub text: String,
    pub style_ranges: Vec<StyleRange>,
}

impl Block {
    /// Creates an unstyled block with a generated key.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_key(Uuid::new_v4(), BlockType::Unstyled, text)
    }

    /// Creates a block with a caller-provided key, e.g. on load.
    pub fn with_key(key: BlockKey, block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            key,
            block_type,
            text: text.into(),
            style_ranges: Vec::new(),
        }
    }

    /// Length of the text in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Union of every range covering the char at `offset`.
    pub fn style_at(&self, offset: usize) -> StyleSet {
        let mut styles = StyleSet::new();
        for range in &self.style_ranges {
            if range.start > offset {
                break;
            }
            if offset < range.end {
                styles.extend_from(&range.styles);
            }
        }
        styles
    }

    /// Removes the text in `span`.
    ///
    /// Ranges entirely inside the span disappear; ranges straddling a span
    /// boundary are truncated to the surviving text. `span` is clamped to the
    /// block length.
    pub fn delete_range(&mut self, span: Span) {
        let len = self.len();
        let end = span.end.min(len);
        let start = span.start.min(end);
        if start == end {
            return;
        }

        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(end);
        self.text.replace_range(byte_start..byte_end, "");

        let removed = end - start;
        let map = |offset: usize| {
            if offset <= start {
                offset
            } else if offset >= end {
                offset - removed
            } else {
                start
            }
        };
        for range in &mut self.style_ranges {
            range.start = map(range.start);
            range.end = map(range.end);
        }
        self.style_ranges.retain(|range| range.start < range.end);
    }

    /// Inserts `text` at char `offset`, styling the inserted chars with
    /// exactly `styles`.
    pub fn insert_text(&mut self, offset: usize, text: &str, styles: &StyleSet) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.len());
        let inserted = text.chars().count();

        let mut per_char = self.char_styles();
        per_char.splice(
            offset..offset,
            std::iter::repeat(styles.clone()).take(inserted),
        );

        let byte_offset = self.byte_offset(offset);
        self.text.insert_str(byte_offset, text);
        self.set_char_styles(per_char);
    }

    /// Adds `style` to every char in `span`, normalizing colours.
    pub fn apply_style(&mut self, span: Span, style: InlineStyle) {
        self.restyle(span, |styles| styles.with_color(style));
    }

    /// Removes every style in `styles` from the chars in `span`.
    pub fn remove_styles(&mut self, span: Span, styles: &[InlineStyle]) {
        self.restyle(span, |current| current.without(styles));
    }

    /// Appends the text and styles of `tail[from..]` to this block.
    pub fn append_from(&mut self, tail: &Block, from: usize) {
        let shift = self.len();
        let from = from.min(tail.len());
        let byte_from = tail.byte_offset(from);
        self.text.push_str(&tail.text[byte_from..]);

        for range in &tail.style_ranges {
            let start = range.start.max(from);
            if start >= range.end {
                continue;
            }
            self.style_ranges.push(StyleRange::new(
                start - from + shift,
                range.end - from + shift,
                range.styles.clone(),
            ));
        }
        self.style_ranges.sort_by_key(|range| range.start);
    }

    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        if self.key.is_nil() {
            return Err(DocumentValidationError::NilBlockKey);
        }

        let len = self.len();
        let mut previous_start = 0;
        for range in &self.style_ranges {
            if range.start > range.end || range.end > len {
                return Err(DocumentValidationError::StyleRangeOutOfBounds {
                    key: self.key,
                    start: range.start,
                    end: range.end,
                    len,
                });
            }
            if range.start < previous_start {
                return Err(DocumentValidationError::UnsortedStyleRanges(self.key));
            }
            previous_start = range.start;
        }

        Ok(())
    }

    fn restyle(&mut self, span: Span, f: impl Fn(&StyleSet) -> StyleSet) {
        let end = span.end.min(self.len());
        let start = span.start.min(end);
        if start == end {
            return;
        }

        let mut per_char = self.char_styles();
        for styles in &mut per_char[start..end] {
            *styles = f(styles);
        }
        self.set_char_styles(per_char);
    }

    fn char_styles(&self) -> Vec<StyleSet> {
        (0..self.len()).map(|offset| self.style_at(offset)).collect()
    }

    /// Rebuilds `style_ranges` as maximal runs of identical non-empty sets.
    fn set_char_styles(&mut self, per_char: Vec<StyleSet>) {
        let mut ranges: Vec<StyleRange> = Vec::new();
        for (offset, styles) in per_char.into_iter().enumerate() {
            if styles.is_empty() {
                continue;
            }
            match ranges.last_mut() {
                Some(last) if last.end == offset && last.styles == styles => last.end += 1,
                _ => ranges.push(StyleRange::new(offset, offset + 1, styles)),
            }
        }
        self.style_ranges = ranges;
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map_or(self.text.len(), |(byte, _)| byte)
    }
}
