//! Fixed trigger rule table and the classifier that picks the active rule.
//!
//! # Responsibility
//! - Declare the markdown triggers the editor understands, in priority order.
//! - Decide which single rule (if any) fires for the current plain text.
//!
//! # Invariants
//! - Rules are evaluated by ascending `priority`; the first active one wins.
//! - Block texts are joined with `BLOCK_SEPARATOR`, which no pattern matches,
//!   so a trigger never spans two blocks.

use super::scanner::Matcher;
use super::FormatError;
use crate::model::style::{BlockType, InlineStyle};
use once_cell::sync::Lazy;

/// Joins block texts in the classifier input. Never typed by users.
pub const BLOCK_SEPARATOR: char = '\u{1}';

static BUILTIN_RULES: Lazy<RuleSet> = Lazy::new(RuleSet::new_builtin);

/// Identifies one built-in trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Header,
    Bold,
    RedLine,
    Underline,
}

impl TriggerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Bold => "bold",
            Self::RedLine => "red_line",
            Self::Underline => "underline",
        }
    }
}

/// When a rule counts as active for the current plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The plain text ends with this literal.
    Suffix(&'static str),
    /// The rule's pattern matches anywhere in the plain text.
    AnyMatch,
}

/// One markdown trigger and the transformation it requests.
#[derive(Debug, Clone)]
pub struct TriggerRule {
    pub kind: TriggerKind,
    /// Lower value wins.
    pub priority: u8,
    pub activation: Activation,
    /// Spans matched by this pattern are deleted when the rule fires.
    pub pattern: Matcher,
    pub resulting_block_type: Option<BlockType>,
    pub resulting_inline_style: Option<InlineStyle>,
    pub color_override: Option<InlineStyle>,
    /// Host-facing key sequence, e.g. `"# + space"`.
    pub trigger_label: &'static str,
    /// Host-facing effect, e.g. `"Header"`.
    pub effect_label: &'static str,
}

impl TriggerRule {
    /// Returns whether this rule is active for `plain_text`.
    pub fn is_active(&self, plain_text: &str) -> bool {
        match self.activation {
            Activation::Suffix(suffix) => plain_text.ends_with(suffix),
            Activation::AnyMatch => self.pattern.is_match(plain_text),
        }
    }
}

/// One row of the instruction table shown by hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub trigger: &'static str,
    pub effect: &'static str,
}

/// Ordered rule table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<TriggerRule>,
}

impl RuleSet {
    /// Shared built-in table.
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN_RULES
    }

    /// Builds a table from arbitrary rules, ordered by priority.
    pub fn from_rules(mut rules: Vec<TriggerRule>) -> Self {
        rules.sort_by_key(|rule| rule.priority);
        Self { rules }
    }

    fn new_builtin() -> Self {
        Self::from_rules(vec![
            TriggerRule {
                kind: TriggerKind::Header,
                priority: 1,
                activation: Activation::Suffix("# "),
                pattern: Matcher::Literal("# "),
                resulting_block_type: Some(BlockType::HeaderOne),
                resulting_inline_style: None,
                color_override: Some(InlineStyle::ColorBlack),
                trigger_label: "# + space",
                effect_label: "Header",
            },
            TriggerRule {
                kind: TriggerKind::Bold,
                priority: 2,
                activation: Activation::AnyMatch,
                pattern: Matcher::AsteriskRun { count: 1 },
                resulting_block_type: Some(BlockType::Unstyled),
                resulting_inline_style: Some(InlineStyle::Bold),
                color_override: Some(InlineStyle::ColorBlack),
                trigger_label: "* + space",
                effect_label: "Bold",
            },
            TriggerRule {
                kind: TriggerKind::RedLine,
                priority: 3,
                activation: Activation::AnyMatch,
                pattern: Matcher::AsteriskRun { count: 2 },
                resulting_block_type: Some(BlockType::Unstyled),
                resulting_inline_style: None,
                color_override: Some(InlineStyle::ColorRed),
                trigger_label: "** + space",
                effect_label: "Red Line",
            },
            TriggerRule {
                kind: TriggerKind::Underline,
                priority: 4,
                activation: Activation::AnyMatch,
                pattern: Matcher::AsteriskRun { count: 3 },
                resulting_block_type: Some(BlockType::Unstyled),
                resulting_inline_style: Some(InlineStyle::Underline),
                color_override: Some(InlineStyle::ColorBlack),
                trigger_label: "*** + space",
                effect_label: "Underline",
            },
        ])
    }

    pub fn rules(&self) -> &[TriggerRule] {
        &self.rules
    }

    /// Checks every rule pattern against probe inputs so a broken table is
    /// reported at startup instead of on the first keystroke.
    pub fn validate(&self) -> Result<(), FormatError> {
        for rule in &self.rules {
            if let Matcher::AsteriskRun { count: 0 } = rule.pattern {
                return Err(FormatError::PatternEngineFailure(format!(
                    "rule `{}` uses an empty asterisk run",
                    rule.kind.as_str()
                )));
            }
            if let Matcher::Literal("") = rule.pattern {
                return Err(FormatError::PatternEngineFailure(format!(
                    "rule `{}` uses an empty literal",
                    rule.kind.as_str()
                )));
            }
            // Forces lazily compiled regexes.
            rule.pattern.is_match("");
        }
        Ok(())
    }

    /// Picks the highest-priority active rule for `plain_text`.
    pub fn classify(&self, plain_text: &str) -> Option<&TriggerRule> {
        self.rules.iter().find(|rule| rule.is_active(plain_text))
    }

    /// Trigger rows followed by the host commands.
    pub fn instructions(&self) -> Vec<Instruction> {
        let mut rows: Vec<Instruction> = self
            .rules
            .iter()
            .map(|rule| Instruction {
                trigger: rule.trigger_label,
                effect: rule.effect_label,
            })
            .collect();
        rows.push(Instruction {
            trigger: "Save",
            effect: "To save text",
        });
        rows.push(Instruction {
            trigger: "Remove Styles",
            effect: "To remove inline styles",
        });
        rows
    }
}

/// Classifies with the built-in table.
pub fn classify(plain_text: &str) -> Option<&'static TriggerRule> {
    RuleSet::builtin().classify(plain_text)
}

#[cfg(test)]
mod tests {
    use super::{classify, RuleSet, TriggerKind, BLOCK_SEPARATOR};

    fn kind(text: &str) -> Option<TriggerKind> {
        classify(text).map(|rule| rule.kind)
    }

    #[test]
    fn builtin_table_is_valid() {
        assert!(RuleSet::builtin().validate().is_ok());
        assert_eq!(RuleSet::builtin().rules().len(), 4);
    }

    #[test]
    fn classifies_each_trigger() {
        assert_eq!(kind("# "), Some(TriggerKind::Header));
        assert_eq!(kind("Hello* "), Some(TriggerKind::Bold));
        assert_eq!(kind("Hello** "), Some(TriggerKind::RedLine));
        assert_eq!(kind("Hello*** "), Some(TriggerKind::Underline));
        assert_eq!(kind("plain text"), None);
        assert_eq!(kind("a**** b"), None);
    }

    #[test]
    fn header_requires_trailing_position() {
        assert_eq!(kind("# title"), None);
        assert_eq!(kind("title # "), Some(TriggerKind::Header));
    }

    #[test]
    fn higher_priority_rule_wins() {
        assert_eq!(kind("a* b# "), Some(TriggerKind::Header));
        assert_eq!(kind("a*** b** c* "), Some(TriggerKind::Bold));
        assert_eq!(kind("a*** b** "), Some(TriggerKind::RedLine));
    }

    #[test]
    fn separator_blocks_cross_block_triggers() {
        let text = format!("a*{BLOCK_SEPARATOR} b");
        assert_eq!(kind(&text), None);
    }

    #[test]
    fn instructions_list_triggers_then_commands() {
        let rows = RuleSet::builtin().instructions();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].trigger, "# + space");
        assert_eq!(rows[0].effect, "Header");
        assert_eq!(rows[5].trigger, "Remove Styles");
    }
}
