//! Document persistence use-cases behind the host "Save" command.
//!
//! # Responsibility
//! - Serialize the document under a fixed key on explicit save.
//! - Hydrate the session document, degrading to an empty one when the stored
//!   form is missing or malformed.
//!
//! # Invariants
//! - Save failures are always returned to the caller.
//! - Load never fails because of stored content; only store errors surface.

use crate::codec::{from_json, to_json, CodecError};
use crate::model::document::Document;
use crate::repo::kv_store::{KvStore, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Key the serialized document is stored under.
pub const DOCUMENT_STORAGE_KEY: &str = "draftRaw";

/// Recoverable persistence failure surfaced to the host.
#[derive(Debug)]
pub enum PersistError {
    Encode(CodecError),
    Store(RepoError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
            Self::Store(err) => write!(f, "document store failure: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Hydrated document plus the reason it was reset, if it was.
#[derive(Debug)]
pub struct LoadOutcome {
    pub document: Document,
    /// Set when a stored document existed but could not be decoded.
    pub warning: Option<CodecError>,
}

pub struct DocumentService<S: KvStore> {
    store: S,
}

impl<S: KvStore> DocumentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Serializes `document` and writes it under [`DOCUMENT_STORAGE_KEY`].
    pub fn save(&self, document: &Document) -> Result<(), PersistError> {
        let started_at = Instant::now();
        let json = to_json(document).map_err(PersistError::Encode)?;

        match self.store.put(DOCUMENT_STORAGE_KEY, &json) {
            Ok(()) => {
                info!(
                    "event=document_save module=service status=ok blocks={} bytes={} duration_ms={}",
                    document.block_count(),
                    json.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=document_save module=service status=error error_code=store_write_failed error={}",
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Loads the stored document.
    ///
    /// Missing data yields `Document::empty()`. Malformed data yields
    /// `Document::empty()` plus a warning.
    pub fn load(&self) -> Result<LoadOutcome, PersistError> {
        let Some(json) = self.store.get(DOCUMENT_STORAGE_KEY)? else {
            info!("event=document_load module=service status=ok source=empty");
            return Ok(LoadOutcome {
                document: Document::empty(),
                warning: None,
            });
        };

        match from_json(&json) {
            Ok(document) => {
                info!(
                    "event=document_load module=service status=ok source=store blocks={}",
                    document.block_count()
                );
                Ok(LoadOutcome {
                    document,
                    warning: None,
                })
            }
            Err(err) => {
                warn!(
                    "event=document_load module=service status=degraded error_code=malformed_document error={}",
                    err
                );
                Ok(LoadOutcome {
                    document: Document::empty(),
                    warning: Some(err),
                })
            }
        }
    }

    /// Removes the stored document. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, PersistError> {
        Ok(self.store.delete(DOCUMENT_STORAGE_KEY)?)
    }
}
