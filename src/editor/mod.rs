//! Editing the forest.
//!
//! Every edit is a pure function from one forest to the next; nothing is
//! edited in place. `EditorState` wraps those functions for one session and
//! keeps the search results in step with the forest.
//!
//! # Modules
//!
//! - `mutation`: add, delete, rename, move, expand and field edits
//! - `placement`: where a moved node lands relative to its target
//! - `state`: the session state (forest, node types, search)
//!
//! # Example
//!
//! ```
//! use treequill::editor::placement::Placement;
//!
//! // Pointer in the top quarter of a 40px row drops before the row
//! assert_eq!(Placement::from_pointer(5.0, 40.0), Placement::Before);
//! assert_eq!(Placement::from_pointer(20.0, 40.0), Placement::Inside);
//! ```

pub mod mutation;
pub mod placement;
pub mod state;
