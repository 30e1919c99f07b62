//! In-memory tree storage.

use super::adapter::{StorageError, StoredTree, TreePatch, TreeStorage};
use crate::document::format::TreeDocument;
use crate::document::ids::{IdGenerator, SequentialIds};
use chrono::Utc;
use indexmap::IndexMap;

/// Keeps trees in insertion order in memory.
///
/// It can be switched offline with `set_unavailable`, after which every
/// write fails; reads keep working.
pub struct MemoryStorage {
    trees: IndexMap<String, StoredTree>,
    ids: SequentialIds,
    unavailable: bool,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            trees: IndexMap::new(),
            ids: SequentialIds::new("tree-"),
            unavailable: false,
        }
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable("memory storage is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl TreeStorage for MemoryStorage {
    fn get_trees(&self) -> Result<Vec<StoredTree>, StorageError> {
        Ok(self.trees.values().cloned().collect())
    }

    fn get_tree(&self, id: &str) -> Result<Option<StoredTree>, StorageError> {
        Ok(self.trees.get(id).cloned())
    }

    fn create_tree(&mut self, document: TreeDocument) -> Result<StoredTree, StorageError> {
        self.check_available()?;
        let stored = StoredTree::new(self.ids.next_id(), document, Utc::now());
        self.trees.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    fn update_tree(&mut self, id: &str, patch: &TreePatch) -> Result<StoredTree, StorageError> {
        self.check_available()?;
        let stored = self
            .trees
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        patch.apply_to(&mut stored.document);
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    fn delete_tree(&mut self, id: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.trees
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
