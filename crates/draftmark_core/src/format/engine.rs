//! Autoformat engine: classify, rewrite and restyle on every text change.
//!
//! # Responsibility
//! - Drive the per-edit cycle `Classifying -> Rewriting -> Restyling -> Idle`.
//! - Contain every per-edit failure as a no-op edit.
//!
//! # Invariants
//! - `process` is pure: it never mutates its input and always returns a
//!   complete document.
//! - No state survives between calls apart from the returned document.

use super::rewriter::{rewrite, Rewrite};
use super::rules::{RuleSet, TriggerKind, TriggerRule, BLOCK_SEPARATOR};
use super::scanner::scan_document;
use super::style::{StyleApplicator, StyleMap, DEFAULT_STYLE_MAP};
use super::{FormatError, FormatResult};
use crate::model::document::Document;
use crate::model::selection::Selection;
use log::{debug, warn};

/// Raw change event forwarded by the presentation layer.
#[derive(Debug, Clone)]
pub struct TextChange {
    /// Document before the user's edit.
    pub previous: Document,
    /// Document after the user's edit, before autoformatting.
    pub current: Document,
}

/// Engine output for one change event.
#[derive(Debug, Clone)]
pub struct Processed {
    pub document: Document,
    /// Selection the host should render.
    pub selection: Selection,
    /// Trigger that fired, if any.
    pub trigger: Option<TriggerKind>,
    /// Contained failure that turned this edit into a (partial) no-op.
    pub degraded: Option<FormatError>,
}

impl Processed {
    fn unchanged(document: &Document) -> Self {
        Self {
            document: document.clone(),
            selection: *document.selection(),
            trigger: None,
            degraded: None,
        }
    }
}

enum EngineState<'r> {
    Idle(Processed),
    Classifying,
    Rewriting(&'r TriggerRule),
    Restyling(&'r TriggerRule, Rewrite),
}

pub struct AutoformatEngine<'a> {
    rules: &'a RuleSet,
    applicator: StyleApplicator<'a>,
}

impl AutoformatEngine<'static> {
    /// Engine over the built-in rules and style map.
    ///
    /// # Errors
    /// - `PatternEngineFailure` when the built-in rule table is broken.
    pub fn try_new() -> FormatResult<Self> {
        Self::with_config(RuleSet::builtin(), &DEFAULT_STYLE_MAP)
    }
}

impl<'a> AutoformatEngine<'a> {
    /// Engine over a caller-provided rule table and style map.
    pub fn with_config(rules: &'a RuleSet, style_map: &'a StyleMap) -> FormatResult<Self> {
        rules.validate()?;
        Ok(Self {
            rules,
            applicator: StyleApplicator::new(style_map),
        })
    }

    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    pub fn applicator(&self) -> &StyleApplicator<'a> {
        &self.applicator
    }

    /// Autoformats `document`, returning it unchanged when no trigger is
    /// active.
    pub fn process(&self, document: &Document) -> Document {
        self.run(document).document
    }

    /// Handles one change event from the host.
    ///
    /// Changes that leave the text untouched (cursor moves, focus changes)
    /// are passed through without a rescan.
    pub fn handle_change(&self, change: &TextChange) -> Processed {
        if change.previous.plain_text(BLOCK_SEPARATOR) == change.current.plain_text(BLOCK_SEPARATOR)
        {
            debug!("event=autoformat module=format status=skip reason=text_unchanged");
            return Processed::unchanged(&change.current);
        }
        self.run(&change.current)
    }

    fn run(&self, document: &Document) -> Processed {
        let mut state = EngineState::Classifying;
        loop {
            state = match state {
                EngineState::Idle(processed) => return processed,
                EngineState::Classifying => {
                    let plain_text = document.plain_text(BLOCK_SEPARATOR);
                    match self.rules.classify(&plain_text) {
                        Some(rule) => EngineState::Rewriting(rule),
                        None => EngineState::Idle(Processed::unchanged(document)),
                    }
                }
                EngineState::Rewriting(rule) => {
                    let spans = scan_document(document, &rule.pattern);
                    match rewrite(document, &spans) {
                        Ok(rewritten) => {
                            debug!(
                                "event=autoformat module=format status=rewrite trigger={} spans={} blocks={}",
                                rule.kind.as_str(),
                                spans.len(),
                                rewritten.touched.len()
                            );
                            EngineState::Restyling(rule, rewritten)
                        }
                        Err(err) => {
                            warn!(
                                "event=autoformat module=format status=error trigger={} error={}",
                                rule.kind.as_str(),
                                err
                            );
                            let mut processed = Processed::unchanged(document);
                            processed.degraded = Some(err);
                            EngineState::Idle(processed)
                        }
                    }
                }
                EngineState::Restyling(rule, rewritten) => {
                    let restyled =
                        self.applicator
                            .apply(&rewritten.document, &rewritten.touched, rule);
                    debug!(
                        "event=autoformat module=format status=ok trigger={} degraded={}",
                        rule.kind.as_str(),
                        restyled.degraded.is_some()
                    );
                    EngineState::Idle(Processed {
                        selection: *restyled.document.selection(),
                        document: restyled.document,
                        trigger: Some(rule.kind),
                        degraded: restyled.degraded,
                    })
                }
            };
        }
    }
}
