//! Key-value persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store serialized documents under string keys.
//! - Isolate SQL details from the document service.

pub mod kv_store;
