//! # Insights Lens Core
//!
//! Pure extraction logic for Insights Lens: resource queries, archive path
//! patterns, document normalization, exploded record reconstruction, and
//! log selection.
//!
//! This crate performs no filesystem or archive I/O. It operates on path
//! strings and byte payloads handed to it by the scanner in the
//! `insights-lens` crate.

pub mod alias;
pub mod logs;
pub mod models;
pub mod normalize;
pub mod pattern;
pub mod reconstruct;
pub mod type_meta;

pub use models::{NamespaceScope, ResourceQuery, StructuredDocument, TypeMeta};
