//! Flattening a display forest into visible rows.
//!
//! This module provides:
//! - `TreeRow`: a single displayable row
//! - `visible_rows`: walks a display forest, descending only into expanded
//!   nodes, and tags rows with their highlight/selection state

use super::projection::Projection;
use crate::document::node::{Icon, Node};
use crate::document::tree::Forest;

/// Represents a single row in the tree display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: String,
    pub name: String,
    /// Indentation depth (0 for roots)
    pub depth: usize,
    pub icon: Option<Icon>,
    /// Whether the row can be expanded
    pub has_children: bool,
    /// Whether the row's children are shown
    pub expanded: bool,
    /// Whether the row is on the selected result's path
    pub highlighted: bool,
    /// Whether the row is the selected result itself
    pub selected: bool,
}

/// Returns the rows a renderer should draw, top to bottom.
///
/// `display` is expected to be the output of `Projection::apply`; rows of
/// nodes the projection hides are skipped regardless.
///
/// # Example
///
/// ```
/// use treequill::document::node::Node;
/// use treequill::document::tree::Forest;
/// use treequill::view::projection::Projection;
/// use treequill::view::rows::visible_rows;
///
/// let forest = Forest::new(vec![
///     Node::new("a", "A").with_child(Node::new("b", "B")),
/// ]);
/// let rows = visible_rows(&forest, &Projection::default());
/// assert_eq!(rows.len(), 1); // "a" is collapsed
/// ```
pub fn visible_rows(display: &Forest, projection: &Projection) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for root in display.roots() {
        build_rows(root, 0, projection, &mut rows);
    }
    rows
}

fn build_rows(node: &Node, depth: usize, projection: &Projection, rows: &mut Vec<TreeRow>) {
    if !projection.is_visible(node) {
        return;
    }

    let expanded = node.is_expanded();
    rows.push(TreeRow {
        id: node.id.clone(),
        name: node.name.clone(),
        depth,
        icon: node.icon.clone(),
        has_children: node.has_children(),
        expanded,
        highlighted: projection.is_highlighted(&node.id),
        selected: projection.selected_id() == Some(node.id.as_str()),
    });

    if expanded {
        for child in &node.children {
            build_rows(child, depth + 1, projection, rows);
        }
    }
}
