//! Block type conversion, style reset and colour normalization.
//!
//! # Responsibility
//! - Apply the winning rule's block type and inline style after deletion.
//! - Implement the host "Remove Styles" command.
//!
//! # Invariants
//! - Styling starts from a cleared style set, so triggers never stack
//!   residual styles from an earlier trigger.
//! - At most one colour is active after styling.
//! - An invalid selection collapses to the start of the first block and skips
//!   styling; text edits already applied are kept.

use super::rules::TriggerRule;
use super::FormatError;
use crate::model::block::BlockKey;
use crate::model::document::Document;
use crate::model::selection::Selection;
use crate::model::style::{BlockType, InlineStyle, StyleSet};
use log::warn;

/// Fixed style configuration: which styles are recognized and how colour
/// styles render.
#[derive(Debug)]
pub struct StyleMap {
    formatting: &'static [InlineStyle],
    colors: &'static [(InlineStyle, &'static str)],
}

/// Built-in style table.
pub static DEFAULT_STYLE_MAP: StyleMap = StyleMap {
    formatting: &[
        InlineStyle::Bold,
        InlineStyle::Italic,
        InlineStyle::Underline,
        InlineStyle::Strikethrough,
        InlineStyle::Code,
    ],
    colors: &[
        (InlineStyle::ColorRed, "#FF0000"),
        (InlineStyle::ColorBlack, "#000000"),
    ],
};

impl StyleMap {
    /// CSS-style hex colour of a colour style.
    pub fn color_of(&self, style: InlineStyle) -> Option<&'static str> {
        self.colors
            .iter()
            .find(|(candidate, _)| *candidate == style)
            .map(|(_, hex)| *hex)
    }

    /// Every style cleared by a style reset.
    pub fn recognized(&self) -> Vec<InlineStyle> {
        self.formatting
            .iter()
            .copied()
            .chain(self.colors.iter().map(|(style, _)| *style))
            .collect()
    }
}

/// Outcome of one styling pass.
#[derive(Debug, Clone)]
pub struct Restyled {
    pub document: Document,
    /// Set when styling was skipped because of a bad selection.
    pub degraded: Option<FormatError>,
}

impl Restyled {
    fn ok(document: Document) -> Self {
        Self {
            document,
            degraded: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StyleApplicator<'a> {
    style_map: &'a StyleMap,
}

impl Default for StyleApplicator<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_STYLE_MAP)
    }
}

impl<'a> StyleApplicator<'a> {
    pub fn new(style_map: &'a StyleMap) -> Self {
        Self { style_map }
    }

    pub fn style_map(&self) -> &'a StyleMap {
        self.style_map
    }

    /// Applies `rule` to a document whose trigger text was already deleted.
    ///
    /// 1. Converts every block in `touched` to the rule's block type.
    /// 2. Moves the cursor to the end of the document.
    /// 3. Clears recognized styles from the selection.
    /// 4. Sets the rule's inline style and colour for the next typed chars.
    pub fn apply(&self, document: &Document, touched: &[BlockKey], rule: &TriggerRule) -> Restyled {
        if let Err(degraded) = self.check_selection(document) {
            return Restyled {
                document: collapse_to_start(document),
                degraded: Some(degraded),
            };
        }

        let mut next = document.clone();
        if let Some(block_type) = rule.resulting_block_type {
            for key in touched {
                if let Some(block) = next.block_mut(*key) {
                    block.block_type = block_type;
                }
            }
        }

        let mut next = next.move_focus_to_end();
        self.clear_selected(&mut next);

        let mut pending = StyleSet::new();
        if let Some(style) = rule.resulting_inline_style {
            pending = pending.with_color(style);
        }
        if let Some(color) = rule.color_override {
            pending = pending.with_color(color);
        }
        next.set_style_override(Some(pending));

        Restyled::ok(next)
    }

    /// "Remove Styles" command: strips recognized styles from the selection,
    /// resets the selected blocks to `Unstyled` and paints them black.
    ///
    /// A collapsed selection only changes the style of the next typed chars.
    pub fn clear_styles(&self, document: &Document) -> Restyled {
        if let Err(degraded) = self.check_selection(document) {
            return Restyled {
                document: collapse_to_start(document),
                degraded: Some(degraded),
            };
        }

        let mut next = document.clone();
        self.clear_selected(&mut next);

        let black: StyleSet = [InlineStyle::ColorBlack].into_iter().collect();
        for (key, span) in document.selected_spans() {
            if let Some(block) = next.block_mut(key) {
                block.block_type = BlockType::Unstyled;
                block.apply_style(span, InlineStyle::ColorBlack);
            }
        }
        if document.selection().is_collapsed() {
            next.set_style_override(Some(black));
        }

        Restyled::ok(next)
    }

    fn clear_selected(&self, document: &mut Document) {
        let recognized = self.style_map.recognized();
        for (key, span) in document.selected_spans() {
            if let Some(block) = document.block_mut(key) {
                block.remove_styles(span, &recognized);
            }
        }
        document.set_style_override(None);
    }

    fn check_selection(&self, document: &Document) -> Result<(), FormatError> {
        document.validate_selection().map_err(|err| {
            warn!(
                "event=style_apply module=format status=skip error_code=invalid_selection error={}",
                err
            );
            FormatError::InvalidSelection(err)
        })
    }
}

fn collapse_to_start(document: &Document) -> Document {
    document.with_selection(Selection::collapsed(document.first_block().key, 0))
}
