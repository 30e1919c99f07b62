//! View-layer projections of the forest.
//!
//! - `projection`: highlight sets, focus mode and ancestor expansion derived
//!   from search results
//! - `rows`: flattening a display forest into rows for a renderer

pub mod projection;
pub mod rows;
