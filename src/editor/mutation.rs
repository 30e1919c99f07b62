//! Structural edits over a forest.
//!
//! Every operation here is a pure function: it takes the current forest by
//! reference and returns the edited forest, leaving the input untouched. The
//! edit is computed on a private copy and only handed back once complete, so a
//! caller swapping the result in never observes a half-applied change.
//!
//! Operations are total. An id that does not resolve (typically a stale id
//! from a double click or an out-of-date drag) turns the operation into a
//! no-op that returns an identical forest; nothing is raised.
//!
//! # Example
//!
//! ```
//! use treequill::document::node::Node;
//! use treequill::document::tree::Forest;
//! use treequill::editor::mutation::move_node;
//! use treequill::editor::placement::Placement;
//!
//! let forest = Forest::new(vec![Node::new("a", "A")
//!     .with_child(Node::new("b", "B"))
//!     .with_child(Node::new("c", "C"))]);
//!
//! let moved = move_node(&forest, "c", "b", Placement::Before);
//! let order: Vec<&str> = moved.roots()[0].children.iter().map(|n| n.id.as_str()).collect();
//! assert_eq!(order, vec!["c", "b"]);
//! ```

use super::placement::Placement;
use crate::document::ids::IdGenerator;
use crate::document::node::{CustomField, Icon, Node, NodeType};
use crate::document::tree::{Forest, Side};
use thiserror::Error;

/// Why a move was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("node {0} does not exist")]
    SourceNotFound(String),
    #[error("node {0} cannot be dropped onto itself")]
    OntoSelf(String),
    #[error("drop target {0} does not exist")]
    TargetNotFound(String),
    #[error("node {node} cannot be moved into its own descendant {target}")]
    IntoDescendant { node: String, target: String },
}

/// Flips the expansion flag of a single node.
pub fn toggle_expand(forest: &Forest, id: &str) -> Forest {
    edit_node(forest, id, |node| {
        node.is_expanded = Some(!node.is_expanded());
    })
}

/// Expands every node in the forest in one pass.
pub fn expand_all(forest: &Forest) -> Forest {
    fn expand(node: &mut Node) {
        node.is_expanded = Some(true);
        node.children.iter_mut().for_each(expand);
    }

    let mut next = forest.clone();
    next.roots_mut().iter_mut().for_each(expand);
    next
}

/// Adds a node as the last child of `parent_id`, or as a new root.
///
/// The parent is expanded so the new node is visible. When the parent id is
/// absent or does not resolve, the node becomes the last root. A node whose
/// subtree reuses an id already present in the forest is refused.
pub fn add_node(forest: &Forest, new_node: Node, parent_id: Option<&str>) -> Forest {
    if let Some(clash) = new_node.subtree_ids().into_iter().find(|id| forest.contains(id)) {
        log::warn!("refusing to add node: id {} is already in use", clash);
        return forest.clone();
    }

    let mut next = forest.clone();
    let new_node = match parent_id {
        Some(parent_id) => match next.append_child(parent_id, new_node) {
            Ok(()) => {
                if let Some(parent) = next.get_mut(parent_id) {
                    parent.is_expanded = Some(true);
                }
                return next;
            }
            Err(orphan) => {
                log::trace!("parent {} not found, adding {} as a root", parent_id, orphan.id);
                orphan
            }
        },
        None => new_node,
    };
    next.roots_mut().push(new_node);
    next
}

/// Removes a node and its entire subtree.
pub fn delete_node(forest: &Forest, id: &str) -> Forest {
    forest.remove_node(id)
}

/// Renames a single node.
pub fn rename_node(forest: &Forest, id: &str, new_name: &str) -> Forest {
    edit_node(forest, id, |node| node.name = new_name.to_string())
}

/// Sets or clears a node's icon.
pub fn set_icon(forest: &Forest, id: &str, icon: Option<Icon>) -> Forest {
    edit_node(forest, id, move |node| node.icon = icon)
}

/// Checks whether `source_id` may be dropped relative to `target_id`.
///
/// This runs before any structural edit so a refused move leaves nothing to
/// undo.
pub fn check_move(forest: &Forest, source_id: &str, target_id: &str) -> Result<(), MoveRejection> {
    if forest.find_node(source_id).is_none() {
        return Err(MoveRejection::SourceNotFound(source_id.to_string()));
    }
    if source_id == target_id {
        return Err(MoveRejection::OntoSelf(source_id.to_string()));
    }
    let target = forest
        .find_node(target_id)
        .ok_or_else(|| MoveRejection::TargetNotFound(target_id.to_string()))?;
    if target.path.iter().any(|ancestor| ancestor == source_id) {
        return Err(MoveRejection::IntoDescendant {
            node: source_id.to_string(),
            target: target_id.to_string(),
        });
    }
    Ok(())
}

/// Moves a node relative to a drop target, or explains why it cannot.
///
/// The moved node keeps its id, children and fields; only its position
/// changes. Dropping `Inside` appends it as the target's last child and
/// expands the target.
pub fn try_move_node(
    forest: &Forest,
    source_id: &str,
    target_id: &str,
    placement: Placement,
) -> Result<Forest, MoveRejection> {
    check_move(forest, source_id, target_id)?;

    let mut next = forest.clone();
    let source = next
        .take_node(source_id)
        .ok_or_else(|| MoveRejection::SourceNotFound(source_id.to_string()))?;

    // The target survives the detach: it is not inside the source's subtree.
    let placed = match placement {
        Placement::Inside => next.append_child(target_id, source).map(|()| {
            if let Some(target) = next.get_mut(target_id) {
                target.is_expanded = Some(true);
            }
        }),
        Placement::Before => next.insert_sibling(target_id, source, Side::Before),
        Placement::After => next.insert_sibling(target_id, source, Side::After),
    };

    match placed {
        Ok(()) => Ok(next),
        Err(_) => Err(MoveRejection::TargetNotFound(target_id.to_string())),
    }
}

/// Moves a node relative to a drop target.
///
/// Refused moves (unknown ids, dropping onto itself, dropping into its own
/// descendant) return an identical forest.
pub fn move_node(forest: &Forest, source_id: &str, target_id: &str, placement: Placement) -> Forest {
    try_move_node(forest, source_id, target_id, placement).unwrap_or_else(|rejection| {
        log::debug!("move {} {} {} rejected: {}", source_id, placement, target_id, rejection);
        forest.clone()
    })
}

/// Assigns a node type to a node, or clears it.
///
/// With a type, the node's fields are rebuilt to follow the type's
/// definitions. An existing field with the same name and type is kept (with
/// its id and value); anything else is created empty. Fields that match no
/// definition are dropped. Clearing the type keeps the fields as free-form
/// fields.
pub fn set_node_type(
    forest: &Forest,
    id: &str,
    node_type: Option<&NodeType>,
    ids: &mut dyn IdGenerator,
) -> Forest {
    edit_node(forest, id, |node| match node_type {
        Some(node_type) => {
            let mut previous = std::mem::take(&mut node.custom_fields);
            node.custom_fields = node_type
                .field_definitions
                .iter()
                .map(|definition| {
                    let reused = previous.iter().position(|f| {
                        f.name == definition.name && f.field_type == definition.field_type
                    });
                    match reused {
                        Some(index) => {
                            let mut field = previous.remove(index);
                            field.definition_id = Some(definition.id.clone());
                            field
                        }
                        None => CustomField::from_definition(definition, ids),
                    }
                })
                .collect();
            node.node_type = Some(node_type.id.clone());
        }
        None => {
            node.node_type = None;
            for field in &mut node.custom_fields {
                field.definition_id = None;
            }
        }
    })
}

/// Appends a custom field to a node.
pub fn add_custom_field(forest: &Forest, id: &str, field: CustomField) -> Forest {
    edit_node(forest, id, move |node| node.custom_fields.push(field))
}

/// Replaces the value of one custom field.
pub fn update_custom_field_value(forest: &Forest, id: &str, field_id: &str, value: &str) -> Forest {
    edit_node(forest, id, |node| {
        if let Some(field) = node.custom_fields.iter_mut().find(|f| f.id == field_id) {
            field.value = value.to_string();
        }
    })
}

/// Removes one custom field from a node.
pub fn remove_custom_field(forest: &Forest, id: &str, field_id: &str) -> Forest {
    edit_node(forest, id, |node| node.custom_fields.retain(|f| f.id != field_id))
}

/// Copies the forest and applies `edit` to the addressed node, if it exists.
fn edit_node(forest: &Forest, id: &str, edit: impl FnOnce(&mut Node)) -> Forest {
    let mut next = forest.clone();
    match next.get_mut(id) {
        Some(node) => edit(node),
        None => log::trace!("node {} not found, edit skipped", id),
    }
    next
}
