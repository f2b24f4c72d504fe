//! FFI use-case API for the Flutter editor surface.
//!
//! # Responsibility
//! - Forward text-change events to the autoformat engine.
//! - Expose the explicit host commands: Save, Load, Remove Styles.
//! - Keep error semantics simple: envelopes with `ok` + message, no throws.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Documents are exchanged as serialized JSON (`draftmark_core::codec`).

use draftmark_core::db::open_db;
use draftmark_core::{
    core_version as core_version_inner, from_json, init_logging as init_logging_inner, to_json,
    AutoformatEngine, Document, DocumentService, FormatError, InlineStyle, RuleSet, SqliteKvStore,
    TextChange,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const DOCUMENT_DB_FILE_NAME: &str = "draftmark_document.sqlite3";
static DOCUMENT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ENGINE: OnceLock<Result<AutoformatEngine<'static>, FormatError>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Idempotent for the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the document database path before first use.
///
/// # FFI contract
/// - Returns empty string on success, including repeated calls with the
///   active path.
/// - Returns an error message when another path is already active.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DOCUMENT_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "document db already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Document envelope returned by every editor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Document to render (serialized). Empty on failure.
    pub document_json: String,
    /// Trigger that fired (`header|bold|red_line|underline`), if any.
    pub trigger: Option<String>,
    /// Human-readable diagnostics for the host.
    pub message: String,
}

impl EditorResponse {
    fn document(document: &Document, trigger: Option<String>, message: impl Into<String>) -> Self {
        match to_json(document) {
            Ok(document_json) => Self {
                ok: true,
                document_json,
                trigger,
                message: message.into(),
            },
            Err(err) => Self::failure(format!("document encode failed: {err}")),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            document_json: String::new(),
            trigger: None,
            message: message.into(),
        }
    }
}

/// One row of the trigger instructions panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionItem {
    pub trigger: String,
    pub effect: String,
}

/// Render colour of one inline style, for the host's custom style map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleColorItem {
    /// Serialized style name, e.g. `COLOR_RED`.
    pub style: String,
    /// CSS hex colour, e.g. `#FF0000`.
    pub hex: String,
}

/// Autoformats the document after a raw text change.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Malformed input yields `ok=false`; unmatched input echoes `current`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_on_change(previous_json: String, current_json: String) -> EditorResponse {
    let engine = match engine() {
        Ok(engine) => engine,
        Err(message) => return EditorResponse::failure(message),
    };
    let (previous, current) = match (from_json(&previous_json), from_json(&current_json)) {
        (Ok(previous), Ok(current)) => (previous, current),
        (Err(err), _) | (_, Err(err)) => {
            return EditorResponse::failure(format!("editor_on_change failed: {err}"))
        }
    };

    let processed = engine.handle_change(&TextChange { previous, current });
    respond(processed)
}

/// Types `text` at the cursor and autoformats the result.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Uses the document's pending style (e.g. after a bold trigger).
#[flutter_rust_bridge::frb(sync)]
pub fn editor_type_text(document_json: String, text: String) -> EditorResponse {
    let engine = match engine() {
        Ok(engine) => engine,
        Err(message) => return EditorResponse::failure(message),
    };
    let previous = match from_json(&document_json) {
        Ok(document) => document,
        Err(err) => return EditorResponse::failure(format!("editor_type_text failed: {err}")),
    };
    let current = match previous.insert_text(&text) {
        Ok(document) => document,
        Err(err) => return EditorResponse::failure(format!("editor_type_text failed: {err}")),
    };

    respond(engine.handle_change(&TextChange { previous, current }))
}

/// "Remove Styles" command over the current selection.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_clear_styles(document_json: String) -> EditorResponse {
    let engine = match engine() {
        Ok(engine) => engine,
        Err(message) => return EditorResponse::failure(message),
    };
    match from_json(&document_json) {
        Ok(document) => {
            let restyled = engine.applicator().clear_styles(&document);
            let message = restyled
                .degraded
                .map(|err| err.to_string())
                .unwrap_or_else(|| "Styles removed.".to_string());
            EditorResponse::document(&restyled.document, None, message)
        }
        Err(err) => EditorResponse::failure(format!("editor_clear_styles failed: {err}")),
    }
}

/// "Save" command: persists the document under the fixed storage key.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Failures are reported, never swallowed.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_save(document_json: String) -> EditorResponse {
    let document = match from_json(&document_json) {
        Ok(document) => document,
        Err(err) => return EditorResponse::failure(format!("editor_save failed: {err}")),
    };
    let db_path = resolve_db_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return EditorResponse::failure(format!("document DB open failed: {err}")),
    };
    let store = match SqliteKvStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => return EditorResponse::failure(format!("document store init failed: {err}")),
    };

    match DocumentService::new(store).save(&document) {
        Ok(()) => EditorResponse::document(&document, None, "Saved."),
        Err(err) => EditorResponse::failure(format!("editor_save failed: {err}")),
    }
}

/// Loads the saved document, or a fresh one when none (or a broken one) is
/// stored.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - A reset caused by malformed data is reported in `message` with `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_load() -> EditorResponse {
    let db_path = resolve_db_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return EditorResponse::failure(format!("document DB open failed: {err}")),
    };
    let store = match SqliteKvStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => return EditorResponse::failure(format!("document store init failed: {err}")),
    };

    match DocumentService::new(store).load() {
        Ok(outcome) => {
            let message = match outcome.warning {
                Some(warning) => format!("Saved document was unreadable and was reset: {warning}"),
                None => "Loaded.".to_string(),
            };
            EditorResponse::document(&outcome.document, None, message)
        }
        Err(err) => EditorResponse::failure(format!("editor_load failed: {err}")),
    }
}

/// Instructions panel rows: triggers first, then host commands.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_instructions() -> Vec<InstructionItem> {
    RuleSet::builtin()
        .instructions()
        .into_iter()
        .map(|row| InstructionItem {
            trigger: row.trigger.to_string(),
            effect: row.effect.to_string(),
        })
        .collect()
}

/// Colour table the host uses to render colour styles.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Returns an empty list when the engine is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_style_map() -> Vec<StyleColorItem> {
    let Ok(engine) = engine() else {
        return Vec::new();
    };
    let style_map = engine.applicator().style_map();
    InlineStyle::ALL
        .into_iter()
        .filter_map(|style| {
            style_map.color_of(style).map(|hex| StyleColorItem {
                style: style.as_str().to_string(),
                hex: hex.to_string(),
            })
        })
        .collect()
}

fn respond(processed: draftmark_core::Processed) -> EditorResponse {
    let trigger = processed.trigger.map(|kind| kind.as_str().to_string());
    let message = match &processed.degraded {
        Some(err) => {
            warn!("event=ffi_on_change module=ffi status=degraded error={err}");
            format!("Edit kept without formatting: {err}")
        }
        None if trigger.is_some() => "Formatted.".to_string(),
        None => String::new(),
    };
    EditorResponse::document(&processed.document, trigger, message)
}

fn engine() -> Result<&'static AutoformatEngine<'static>, String> {
    ENGINE
        .get_or_init(AutoformatEngine::try_new)
        .as_ref()
        .map_err(|err| format!("autoformat engine unavailable: {err}"))
}

fn resolve_db_path() -> PathBuf {
    DOCUMENT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("DRAFTMARK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DOCUMENT_DB_FILE_NAME)
        })
        .clone()
}
