//! Display projections derived from search results.
//!
//! Nothing here edits the authoritative forest. Expansion forced by search
//! navigation and focus-mode filtering are applied to a display copy, so
//! browsing results never overwrites the user's own collapse/expand choices
//! in the saved document.

use crate::document::node::Node;
use crate::document::tree::Forest;
use crate::query::SearchResult;
use std::collections::HashSet;

/// Returns the ids on a result's path: every ancestor and the node itself.
pub fn highlighted_path(result: &SearchResult) -> HashSet<String> {
    result.path.iter().cloned().collect()
}

/// Focus mode is on exactly when a search produced at least one result.
pub fn is_focus_mode(results: &[SearchResult]) -> bool {
    !results.is_empty()
}

/// Returns a copy of the forest with every node on `path` expanded.
///
/// Nodes off the path keep their expansion flag as-is.
pub fn expand_ancestors(forest: &Forest, path: &[String]) -> Forest {
    let on_path: HashSet<&str> = path.iter().map(String::as_str).collect();
    Forest::new(
        forest
            .roots()
            .iter()
            .map(|root| expand_marked(root, &on_path))
            .collect(),
    )
}

fn expand_marked(node: &Node, on_path: &HashSet<&str>) -> Node {
    let mut copy = Node {
        children: node
            .children
            .iter()
            .map(|child| expand_marked(child, on_path))
            .collect(),
        ..node_without_children(node)
    };
    if on_path.contains(copy.id.as_str()) {
        copy.is_expanded = Some(true);
    }
    copy
}

/// Returns true if the node or any of its descendants is highlighted.
pub fn leads_to_highlight(node: &Node, highlighted: &HashSet<String>) -> bool {
    highlighted.contains(&node.id)
        || node
            .children
            .iter()
            .any(|child| leads_to_highlight(child, highlighted))
}

/// Returns a copy of the forest holding only nodes that are highlighted or
/// lead to a highlighted node.
pub fn focus_filter(forest: &Forest, highlighted: &HashSet<String>) -> Forest {
    Forest::new(filter_nodes(forest.roots(), highlighted))
}

fn filter_nodes(nodes: &[Node], highlighted: &HashSet<String>) -> Vec<Node> {
    nodes
        .iter()
        .filter(|node| leads_to_highlight(node, highlighted))
        .map(|node| Node {
            children: filter_nodes(&node.children, highlighted),
            ..node_without_children(node)
        })
        .collect()
}

fn node_without_children(node: &Node) -> Node {
    Node {
        id: node.id.clone(),
        name: node.name.clone(),
        children: Vec::new(),
        is_expanded: node.is_expanded,
        icon: node.icon.clone(),
        node_type: node.node_type.clone(),
        custom_fields: node.custom_fields.clone(),
    }
}

/// The view state derived from a result list and a selected index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub focus_mode: bool,
    /// Ids on the selected result's path
    pub highlighted: HashSet<String>,
    /// Path of the selected result, root first
    pub selected_path: Vec<String>,
}

impl Projection {
    /// Derives the projection for `results[selected]`.
    ///
    /// An out-of-range index falls back to the first result.
    pub fn compute(results: &[SearchResult], selected: usize) -> Self {
        let Some(result) = results.get(selected).or_else(|| results.first()) else {
            return Self::default();
        };
        Self {
            focus_mode: is_focus_mode(results),
            highlighted: highlighted_path(result),
            selected_path: result.path.clone(),
        }
    }

    /// Returns the id of the selected node, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_path.last().map(String::as_str)
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    /// Returns true if the node should be shown under this projection.
    pub fn is_visible(&self, node: &Node) -> bool {
        !self.focus_mode || leads_to_highlight(node, &self.highlighted)
    }

    /// Builds the display forest: ancestors of the selection expanded (when
    /// `auto_expand` is set) and, in focus mode, unrelated subtrees removed.
    pub fn apply(&self, forest: &Forest, auto_expand: bool) -> Forest {
        let expanded = if auto_expand && !self.selected_path.is_empty() {
            expand_ancestors(forest, &self.selected_path)
        } else {
            forest.clone()
        };
        if self.focus_mode {
            focus_filter(&expanded, &self.highlighted)
        } else {
            expanded
        }
    }
}
