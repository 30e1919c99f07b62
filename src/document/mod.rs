//! Document model for treequill.
//!
//! - `node`: nodes, node types, field definitions and custom fields
//! - `tree`: the `Forest` and its id-addressed navigation primitives
//! - `ids`: identity generation for new nodes and fields
//! - `format`: the serialized `TreeDocument`
//! - `parser`: validating import from JSON or YAML
//! - `error`: import validation errors

pub mod error;
pub mod format;
pub mod ids;
pub mod node;
pub mod parser;
pub mod tree;
