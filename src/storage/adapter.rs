//! The storage adapter contract.
//!
//! The engine never interprets a storage failure beyond "the operation did
//! not complete": the in-memory forest stays the source of truth and is left
//! unchanged, and retrying is up to the caller.

use crate::document::format::TreeDocument;
use crate::document::node::NodeType;
use crate::document::tree::Forest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("tree {0} not found")]
    NotFound(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored tree {id} is unreadable: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

/// A document as kept by storage, with its id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTree {
    pub id: String,
    #[serde(flatten)]
    pub document: TreeDocument,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredTree {
    pub fn new(id: impl Into<String>, document: TreeDocument, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            document,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update; absent parts are left as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreePatch {
    pub tree: Option<Forest>,
    pub node_types: Option<Vec<NodeType>>,
    pub tree_title: Option<String>,
}

impl TreePatch {
    /// A patch replacing every part of the document.
    pub fn full(document: &TreeDocument) -> Self {
        Self {
            tree: Some(document.tree.clone()),
            node_types: Some(document.node_types.clone()),
            tree_title: Some(document.tree_title.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none() && self.node_types.is_none() && self.tree_title.is_none()
    }

    /// Combines an older patch with a newer one; the newer wins part by part.
    pub fn merge(self, newer: TreePatch) -> TreePatch {
        TreePatch {
            tree: newer.tree.or(self.tree),
            node_types: newer.node_types.or(self.node_types),
            tree_title: newer.tree_title.or(self.tree_title),
        }
    }

    /// Applies the patch to a document in place.
    pub fn apply_to(&self, document: &mut TreeDocument) {
        if let Some(tree) = &self.tree {
            document.tree = tree.clone();
        }
        if let Some(node_types) = &self.node_types {
            document.node_types = node_types.clone();
        }
        if let Some(title) = &self.tree_title {
            document.tree_title = title.clone();
        }
    }
}

/// Persistence for whole tree documents.
pub trait TreeStorage {
    /// Lists every stored tree, oldest first.
    fn get_trees(&self) -> Result<Vec<StoredTree>, StorageError>;

    /// Fetches one tree, or `None` if the id is unknown.
    fn get_tree(&self, id: &str) -> Result<Option<StoredTree>, StorageError>;

    /// Stores a new document under a fresh id.
    fn create_tree(&mut self, document: TreeDocument) -> Result<StoredTree, StorageError>;

    /// Applies a partial update and bumps `updated_at`.
    fn update_tree(&mut self, id: &str, patch: &TreePatch) -> Result<StoredTree, StorageError>;

    /// Deletes a tree. Deleting an unknown id is an error.
    fn delete_tree(&mut self, id: &str) -> Result<(), StorageError>;
}
