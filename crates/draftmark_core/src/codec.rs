//! Serialized document form used for persistence and the host bridge.
//!
//! # Responsibility
//! - Convert documents to and from a raw block list with camelCase fields.
//!   Keys are UUID strings and each range carries a whole style set, so
//!   draft-js raw payloads are not accepted as-is.
//! - Reject structurally invalid raw input instead of repairing it.
//!
//! # Invariants
//! - `from_raw(&to_raw(doc)) == doc` for every valid document.
//! - Style ranges are stored as `offset`/`length` char counts.

use crate::model::block::{Block, StyleRange};
use crate::model::document::Document;
use crate::model::selection::Selection;
use crate::model::style::{BlockType, StyleSet};
use crate::model::DocumentValidationError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Top-level raw document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<RawSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_override: Option<StyleSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub text: String,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub styles: StyleSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSelection {
    pub anchor_key: String,
    pub anchor_offset: usize,
    pub focus_key: String,
    pub focus_offset: usize,
}

/// Failure to decode a serialized document.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    InvalidKey(String),
    Invalid(DocumentValidationError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed serialized document: {err}"),
            Self::InvalidKey(key) => {
                write!(f, "malformed serialized document: invalid key `{key}`")
            }
            Self::Invalid(err) => write!(f, "malformed serialized document: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidKey(_) => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<DocumentValidationError> for CodecError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Invalid(value)
    }
}

pub fn to_raw(document: &Document) -> RawDocument {
    let selection = document.selection();
    RawDocument {
        blocks: document.blocks().map(block_to_raw).collect(),
        selection: Some(RawSelection {
            anchor_key: selection.anchor_key.to_string(),
            anchor_offset: selection.anchor_offset,
            focus_key: selection.focus_key.to_string(),
            focus_offset: selection.focus_offset,
        }),
        style_override: document.style_override().cloned(),
    }
}

/// Decodes and validates a raw document.
///
/// A missing selection collapses to the start of the first block.
pub fn from_raw(raw: &RawDocument) -> Result<Document, CodecError> {
    let blocks = raw
        .blocks
        .iter()
        .map(block_from_raw)
        .collect::<Result<Vec<_>, _>>()?;

    let selection = match &raw.selection {
        Some(selection) => Some(Selection {
            anchor_key: parse_key(&selection.anchor_key)?,
            anchor_offset: selection.anchor_offset,
            focus_key: parse_key(&selection.focus_key)?,
            focus_offset: selection.focus_offset,
        }),
        None => None,
    };

    let document = Document::from_blocks(blocks, selection)?;
    Ok(match &raw.style_override {
        Some(style) => document.with_style_override(Some(style.clone())),
        None => document,
    })
}

pub fn to_json(document: &Document) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&to_raw(document))?)
}

pub fn from_json(json: &str) -> Result<Document, CodecError> {
    let raw: RawDocument = serde_json::from_str(json)?;
    from_raw(&raw)
}

fn block_to_raw(block: &Block) -> RawBlock {
    RawBlock {
        key: block.key.to_string(),
        block_type: block.block_type,
        text: block.text.clone(),
        inline_style_ranges: block
            .style_ranges
            .iter()
            .map(|range| RawStyleRange {
                offset: range.start,
                length: range.end - range.start,
                styles: range.styles.clone(),
            })
            .collect(),
    }
}

fn block_from_raw(raw: &RawBlock) -> Result<Block, CodecError> {
    let mut block = Block::with_key(parse_key(&raw.key)?, raw.block_type, raw.text.clone());
    block.style_ranges = raw
        .inline_style_ranges
        .iter()
        .map(|range| {
            StyleRange::new(
                range.offset,
                range.offset.saturating_add(range.length),
                range.styles.clone(),
            )
        })
        .collect();
    Ok(block)
}

fn parse_key(value: &str) -> Result<Uuid, CodecError> {
    Uuid::parse_str(value).map_err(|_| CodecError::InvalidKey(value.to_string()))
}
