//! Checklist catalog: pillars and interview questions.
//!
//! The catalog is immutable after load and shared process-wide behind
//! an `Arc`; concurrent reads need no synchronization.

pub(crate) mod catalog;

pub use catalog::{Catalog, CatalogError, ChecklistQuestion, Pillar};
