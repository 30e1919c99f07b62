//! TreeQuill - an editing engine for nested labeled trees.
//!
//! Nodes carry a name, an optional icon, children and typed custom fields.
//! Node types describe which fields their nodes carry. The engine provides
//! copy-on-write structural edits, a structured search language, display
//! projections for search results, schema reconciliation, and persistence.

pub mod config;
pub mod document;
pub mod editor;
pub mod file;
pub mod query;
pub mod schema;
pub mod storage;
pub mod view;
