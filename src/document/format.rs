//! The serialized tree document.
//!
//! A `TreeDocument` is what gets exported, imported and handed to storage:
//! the forest, the node-type schemas and the document title. Exports are
//! additionally stamped with a format `version` and an `exportDate`.

use super::node::NodeType;
use super::tree::Forest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format version written into exported documents.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDocument {
    pub tree: Forest,
    #[serde(default)]
    pub node_types: Vec<NodeType>,
    #[serde(default)]
    pub tree_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
}

impl TreeDocument {
    pub fn new(tree: Forest, node_types: Vec<NodeType>, tree_title: impl Into<String>) -> Self {
        Self {
            tree,
            node_types,
            tree_title: tree_title.into(),
            version: None,
            export_date: None,
        }
    }

    /// Returns a copy stamped with the export version and the given date.
    pub fn stamped(&self, export_date: DateTime<Utc>) -> Self {
        Self {
            version: Some(EXPORT_VERSION.to_string()),
            export_date: Some(export_date),
            ..self.clone()
        }
    }

    /// Returns the node type with the given id.
    pub fn node_type(&self, id: &str) -> Option<&NodeType> {
        self.node_types.iter().find(|t| t.id == id)
    }

    /// Lists `(node id, node type id)` pairs whose type does not exist.
    pub fn dangling_type_refs(&self) -> Vec<(String, String)> {
        self.tree
            .iter()
            .filter_map(|node| {
                let type_id = node.node_type.as_ref()?;
                if self.node_type(type_id).is_none() {
                    Some((node.id.clone(), type_id.clone()))
                } else {
                    None
                }
            })
            .collect()
    }
}
