//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate codec and store calls into host-command APIs.
//! - Keep the FFI layer decoupled from storage details.

pub mod document_service;
