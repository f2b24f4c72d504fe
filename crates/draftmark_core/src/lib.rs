//! Markdown-trigger autoformat engine for a block-structured rich-text editor.
//! This crate owns the document model, the trigger pipeline and persistence.

pub mod codec;
pub mod db;
pub mod format;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::{from_json, from_raw, to_json, to_raw, CodecError, RawDocument};
pub use format::engine::{AutoformatEngine, Processed, TextChange};
pub use format::rules::{classify, Instruction, RuleSet, TriggerKind, TriggerRule};
pub use format::scanner::{scan, scan_document, DocumentSpan, Matcher};
pub use format::style::{StyleApplicator, StyleMap, DEFAULT_STYLE_MAP};
pub use format::{FormatError, FormatResult};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::block::{Block, BlockKey, Span, StyleRange};
pub use model::document::Document;
pub use model::selection::Selection;
pub use model::style::{BlockType, InlineStyle, StyleSet};
pub use model::DocumentValidationError;
pub use repo::kv_store::{KvStore, RepoError, RepoResult, SqliteKvStore};
pub use service::document_service::{
    DocumentService, LoadOutcome, PersistError, DOCUMENT_STORAGE_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
