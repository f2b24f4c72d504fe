//! Block types, inline styles and per-character style sets.
//!
//! # Invariants
//! - A `StyleSet` built through `with_color` never holds both colours.
//! - Serialized names follow the raw draft content naming
//!   (`header-one`, `BOLD`, `COLOR_RED`, ...).

use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::BTreeSet;

/// Structural type of one block. Exactly one per block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// Plain paragraph.
    #[default]
    Unstyled,
    /// Top-level heading.
    HeaderOne,
}

/// Character-level formatting attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    ColorRed,
    ColorBlack,
}

impl InlineStyle {
    /// Every style the engine recognizes, in declaration order.
    pub const ALL: [InlineStyle; 7] = [
        InlineStyle::Bold,
        InlineStyle::Italic,
        InlineStyle::Underline,
        InlineStyle::Strikethrough,
        InlineStyle::Code,
        InlineStyle::ColorRed,
        InlineStyle::ColorBlack,
    ];

    /// Returns whether this style is one of the mutually exclusive colours.
    pub fn is_color(self) -> bool {
        matches!(self, Self::ColorRed | Self::ColorBlack)
    }

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "BOLD",
            Self::Italic => "ITALIC",
            Self::Underline => "UNDERLINE",
            Self::Strikethrough => "STRIKETHROUGH",
            Self::Code => "CODE",
            Self::ColorRed => "COLOR_RED",
            Self::ColorBlack => "COLOR_BLACK",
        }
    }
}

/// Ordered set of inline styles covering one character (or one range).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSet(BTreeSet<InlineStyle>);

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, style: InlineStyle) -> bool {
        self.0.contains(&style)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, InlineStyle> {
        self.0.iter()
    }

    /// Inserts `style` as-is. Colours are not normalized here; use
    /// [`StyleSet::with_color`] for that.
    pub fn insert(&mut self, style: InlineStyle) {
        self.0.insert(style);
    }

    pub fn remove(&mut self, style: InlineStyle) {
        self.0.remove(&style);
    }

    /// Returns a copy with `style` added. A colour replaces any other colour.
    pub fn with_color(&self, style: InlineStyle) -> Self {
        let mut next = self.clone();
        if style.is_color() {
            next.0.retain(|existing| !existing.is_color());
        }
        next.0.insert(style);
        next
    }

    /// Returns a copy without any of `styles`.
    pub fn without(&self, styles: &[InlineStyle]) -> Self {
        let mut next = self.clone();
        next.0.retain(|existing| !styles.contains(existing));
        next
    }

    /// Adds every style of `other`.
    pub fn extend_from(&mut self, other: &StyleSet) {
        self.0.extend(other.0.iter().copied());
    }
}

impl FromIterator<InlineStyle> for StyleSet {
    fn from_iter<T: IntoIterator<Item = InlineStyle>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StyleSet {
    type Item = &'a InlineStyle;
    type IntoIter = btree_set::Iter<'a, InlineStyle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{InlineStyle, StyleSet};

    #[test]
    fn with_color_replaces_existing_color() {
        let set: StyleSet = [InlineStyle::Bold, InlineStyle::ColorBlack]
            .into_iter()
            .collect();

        let red = set.with_color(InlineStyle::ColorRed);
        assert!(red.contains(InlineStyle::Bold));
        assert!(red.contains(InlineStyle::ColorRed));
        assert!(!red.contains(InlineStyle::ColorBlack));
    }

    #[test]
    fn without_drops_listed_styles_only() {
        let set: StyleSet = [InlineStyle::Bold, InlineStyle::Code].into_iter().collect();
        let trimmed = set.without(&[InlineStyle::Bold]);
        assert_eq!(trimmed, [InlineStyle::Code].into_iter().collect());
    }

    #[test]
    fn serializes_with_raw_style_names() {
        let set: StyleSet = [InlineStyle::ColorRed, InlineStyle::Bold]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!(["BOLD", "COLOR_RED"]));
    }
}
