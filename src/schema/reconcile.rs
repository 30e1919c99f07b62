//! Propagating node-type definition changes into existing nodes.
//!
//! When a node type's field definitions are replaced, `diff_definitions`
//! compares the old and new lists by definition id (so a renamed field is
//! recognised as the same field) and `apply_diff` rewrites the custom fields
//! of every node of that type:
//!
//! 1. fields of removed definitions are dropped
//! 2. an empty field is appended for each added definition
//! 3. renamed definitions rename their field, keeping its value
//! 4. definitions whose type changed update the field type and clear the
//!    value, since the old value no longer fits the new type
//!
//! Nodes of other types and untyped nodes are left as they are; their
//! children are still visited.
//!
//! # Example
//!
//! ```
//! use treequill::document::ids::SequentialIds;
//! use treequill::document::node::{CustomField, FieldDefinition, FieldType, Node};
//! use treequill::document::tree::Forest;
//! use treequill::schema::reconcile::reconcile;
//!
//! let old = vec![FieldDefinition::new("d1", "Status", FieldType::Text)];
//! let new = vec![
//!     FieldDefinition::new("d1", "State", FieldType::Text),
//!     FieldDefinition::new("d2", "Owner", FieldType::Text),
//! ];
//! let forest = Forest::new(vec![Node::new("n", "N").with_node_type("T").with_custom_field(
//!     CustomField::new("f1", "Status", FieldType::Text, "Active").with_definition_id("d1"),
//! )]);
//!
//! let next = reconcile(&forest, "T", &old, &new, &mut SequentialIds::new("f"));
//! let fields = &next.get("n").unwrap().custom_fields;
//! assert_eq!((fields[0].name.as_str(), fields[0].value.as_str()), ("State", "Active"));
//! assert_eq!((fields[1].name.as_str(), fields[1].value.as_str()), ("Owner", ""));
//! ```

use crate::document::ids::IdGenerator;
use crate::document::node::{CustomField, FieldDefinition, FieldType, Node};
use crate::document::tree::Forest;

/// A definition that kept its id but changed its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRename {
    pub definition_id: String,
    pub name: String,
}

/// A definition that kept its id but changed its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTypeChange {
    pub definition_id: String,
    pub field_type: FieldType,
}

/// The difference between two definition lists, matched by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDiff {
    pub added: Vec<FieldDefinition>,
    pub removed: Vec<String>,
    pub renamed: Vec<FieldRename>,
    pub type_changed: Vec<FieldTypeChange>,
}

impl FieldDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.renamed.is_empty()
            && self.type_changed.is_empty()
    }
}

/// Computes the diff between the old and the new definition list.
pub fn diff_definitions(old: &[FieldDefinition], new: &[FieldDefinition]) -> FieldDiff {
    let mut diff = FieldDiff::default();

    for definition in new {
        match old.iter().find(|o| o.id == definition.id) {
            None => diff.added.push(definition.clone()),
            Some(previous) => {
                if previous.name != definition.name {
                    diff.renamed.push(FieldRename {
                        definition_id: definition.id.clone(),
                        name: definition.name.clone(),
                    });
                }
                if previous.field_type != definition.field_type {
                    diff.type_changed.push(FieldTypeChange {
                        definition_id: definition.id.clone(),
                        field_type: definition.field_type,
                    });
                }
            }
        }
    }

    diff.removed = old
        .iter()
        .filter(|o| !new.iter().any(|n| n.id == o.id))
        .map(|o| o.id.clone())
        .collect();

    diff
}

/// Applies a diff to every node whose type is `type_id`.
///
/// Applying the same diff twice gives the same forest as applying it once:
/// an added definition that already has a field on the node is not added
/// again.
pub fn apply_diff(
    forest: &Forest,
    type_id: &str,
    diff: &FieldDiff,
    ids: &mut dyn IdGenerator,
) -> Forest {
    if diff.is_empty() {
        return forest.clone();
    }

    let mut next = forest.clone();
    let mut touched = 0usize;
    for root in next.roots_mut().iter_mut() {
        touched += apply_to_subtree(root, type_id, diff, ids);
    }
    log::debug!(
        "reconciled {} node(s) of type {}: +{} -{} renamed {} retyped {}",
        touched,
        type_id,
        diff.added.len(),
        diff.removed.len(),
        diff.renamed.len(),
        diff.type_changed.len()
    );
    next
}

/// Diffs `old` against `new` and applies the result to nodes of `type_id`.
pub fn reconcile(
    forest: &Forest,
    type_id: &str,
    old: &[FieldDefinition],
    new: &[FieldDefinition],
    ids: &mut dyn IdGenerator,
) -> Forest {
    apply_diff(forest, type_id, &diff_definitions(old, new), ids)
}

fn apply_to_subtree(
    node: &mut Node,
    type_id: &str,
    diff: &FieldDiff,
    ids: &mut dyn IdGenerator,
) -> usize {
    let mut touched = 0;
    if node.node_type.as_deref() == Some(type_id) {
        apply_to_fields(&mut node.custom_fields, diff, ids);
        touched += 1;
    }
    for child in &mut node.children {
        touched += apply_to_subtree(child, type_id, diff, ids);
    }
    touched
}

fn apply_to_fields(fields: &mut Vec<CustomField>, diff: &FieldDiff, ids: &mut dyn IdGenerator) {
    fields.retain(|f| !diff.removed.iter().any(|id| id == f.definition_key()));

    for definition in &diff.added {
        if !fields.iter().any(|f| f.definition_key() == definition.id) {
            fields.push(CustomField::from_definition(definition, ids));
        }
    }

    for rename in &diff.renamed {
        for field in fields
            .iter_mut()
            .filter(|f| f.definition_key() == rename.definition_id)
        {
            field.name = rename.name.clone();
        }
    }

    for change in &diff.type_changed {
        for field in fields
            .iter_mut()
            .filter(|f| f.definition_key() == change.definition_id)
        {
            field.field_type = change.field_type;
            field.value.clear();
        }
    }
}
