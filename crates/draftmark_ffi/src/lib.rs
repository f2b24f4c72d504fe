//! Flutter-facing bridge over `draftmark_core`.
//!
//! Documents cross the boundary in their serialized JSON form.

pub mod api;
