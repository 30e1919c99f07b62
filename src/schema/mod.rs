//! Node-type schema maintenance.
//!
//! - `reconcile`: diffing field-definition lists and applying the diff to
//!   every node of the edited type

pub mod reconcile;

pub use reconcile::{apply_diff, diff_definitions, reconcile, FieldDiff};
