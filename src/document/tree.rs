//! Id-addressed navigation over a forest of nodes.
//!
//! This module provides the `Forest` type: the ordered sequence of root nodes
//! that make up a document. Nodes are addressed by their globally unique id
//! rather than by position, so lookups stay valid while siblings are inserted
//! or moved around them.
//!
//! Read operations borrow the forest. Structural edits come in two flavours:
//! pure ones (`remove_node`) that return a new forest and leave `self` alone,
//! and crate-private in-place primitives used by the mutation engine on a
//! private copy before it is handed back.
//!
//! # Example
//!
//! ```
//! use treequill::document::node::Node;
//! use treequill::document::tree::Forest;
//!
//! let forest = Forest::new(vec![
//!     Node::new("a", "A").with_child(Node::new("b", "B").with_child(Node::new("c", "C"))),
//! ]);
//!
//! let found = forest.find_node("c").unwrap();
//! assert_eq!(found.node.name, "C");
//! assert_eq!(found.path, vec!["a", "b", "c"]);
//!
//! let pruned = forest.remove_node("b");
//! assert!(pruned.find_node("c").is_none());
//! assert!(forest.find_node("c").is_some());
//! ```

use super::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node together with the ids leading to it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLocation<'a> {
    pub node: &'a Node,
    /// Ancestor ids from a root down to and including the node itself
    pub path: Vec<String>,
}

impl NodeLocation<'_> {
    /// Depth of the node, 0 for roots.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Id of the parent node, or `None` for roots.
    pub fn parent_id(&self) -> Option<&str> {
        let len = self.path.len();
        if len >= 2 {
            Some(&self.path[len - 2])
        } else {
            None
        }
    }
}

/// Which side of a sibling to insert at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Before,
    After,
}

/// The ordered list of root nodes of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    roots: Vec<Node>,
}

impl Forest {
    /// Creates a forest from its root nodes.
    pub fn new(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    /// Returns the root nodes.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Consumes the forest and returns its roots.
    pub fn into_roots(self) -> Vec<Node> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over every node in depth-first pre-order.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Finds a node by id with a depth-first pre-order search.
    ///
    /// Returns `None` when the id is absent, which callers treat as a stale
    /// reference rather than a fault.
    pub fn find_node(&self, id: &str) -> Option<NodeLocation<'_>> {
        let mut path = Vec::new();
        locate(&self.roots, id, &mut path).map(|node| NodeLocation { node, path })
    }

    /// Returns the node with the given id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.find_node(id).map(|found| found.node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.roots.iter().any(|root| root.contains(id))
    }

    /// Returns a copy of the forest without the node and its subtree.
    ///
    /// Removing an absent id returns an identical forest.
    pub fn remove_node(&self, id: &str) -> Forest {
        let mut next = self.clone();
        next.take_node(id);
        next
    }

    /// Returns every id that occurs more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for node in self.iter() {
            if !seen.insert(node.id.as_str()) && !duplicates.contains(&node.id) {
                duplicates.push(node.id.clone());
            }
        }
        duplicates
    }

    /// Gets a mutable reference to the node with the given id.
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        locate_mut(&mut self.roots, id)
    }

    pub(crate) fn roots_mut(&mut self) -> &mut Vec<Node> {
        &mut self.roots
    }

    /// Detaches the node with the given id and returns it with its subtree.
    pub(crate) fn take_node(&mut self, id: &str) -> Option<Node> {
        extract(&mut self.roots, id)
    }

    /// Appends `node` as the last child of `parent_id`.
    ///
    /// Gives the node back if the parent does not exist.
    pub(crate) fn append_child(&mut self, parent_id: &str, node: Node) -> Result<(), Node> {
        match self.get_mut(parent_id) {
            Some(parent) => {
                parent.children.push(node);
                Ok(())
            }
            None => Err(node),
        }
    }

    /// Inserts `node` directly before or after `target_id`, at whatever depth
    /// the target sits.
    ///
    /// Gives the node back if the target does not exist.
    pub(crate) fn insert_sibling(&mut self, target_id: &str, node: Node, side: Side) -> Result<(), Node> {
        insert_beside(&mut self.roots, target_id, node, side)
    }
}

impl From<Vec<Node>> for Forest {
    fn from(roots: Vec<Node>) -> Self {
        Self::new(roots)
    }
}

/// Depth-first pre-order iterator over a forest.
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn locate<'a>(nodes: &'a [Node], id: &str, path: &mut Vec<String>) -> Option<&'a Node> {
    for node in nodes {
        path.push(node.id.clone());
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = locate(&node.children, id, path) {
            return Some(found);
        }
        path.pop();
    }
    None
}

fn locate_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = locate_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn extract(nodes: &mut Vec<Node>, id: &str) -> Option<Node> {
    if let Some(index) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(index));
    }
    nodes.iter_mut().find_map(|n| extract(&mut n.children, id))
}

fn insert_beside(nodes: &mut Vec<Node>, target_id: &str, node: Node, side: Side) -> Result<(), Node> {
    if let Some(index) = nodes.iter().position(|n| n.id == target_id) {
        let at = match side {
            Side::Before => index,
            Side::After => index + 1,
        };
        nodes.insert(at, node);
        return Ok(());
    }

    let mut node = node;
    for sibling in nodes.iter_mut() {
        match insert_beside(&mut sibling.children, target_id, node, side) {
            Ok(()) => return Ok(()),
            Err(back) => node = back,
        }
    }
    Err(node)
}
