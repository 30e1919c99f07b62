//! Batching rapid edits into one storage write.
//!
//! Edits are scheduled as patches; a write happens only once no new patch
//! has arrived for the quiet period. A newer patch supersedes the pending
//! one part by part (last write wins). The caller drives time explicitly by
//! passing `now`, typically from its event loop tick.

use super::adapter::{StorageError, StoredTree, TreePatch, TreeStorage};
use std::time::{Duration, Instant};

pub struct DebouncedSaver {
    tree_id: String,
    quiet: Duration,
    pending: Option<TreePatch>,
    last_change: Option<Instant>,
}

impl DebouncedSaver {
    pub fn new(tree_id: impl Into<String>, quiet: Duration) -> Self {
        Self {
            tree_id: tree_id.into(),
            quiet,
            pending: None,
            last_change: None,
        }
    }

    pub fn tree_id(&self) -> &str {
        &self.tree_id
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Queues a patch, restarting the quiet period.
    pub fn schedule(&mut self, patch: TreePatch, now: Instant) {
        self.pending = Some(match self.pending.take() {
            Some(older) => older.merge(patch),
            None => patch,
        });
        self.last_change = Some(now);
    }

    /// Returns true if a patch is waiting and the quiet period has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        match (self.pending.as_ref(), self.last_change) {
            (Some(_), Some(changed)) => now.saturating_duration_since(changed) >= self.quiet,
            _ => false,
        }
    }

    /// Writes the pending patch if it is due; `None` if nothing was attempted.
    pub fn poll(
        &mut self,
        now: Instant,
        storage: &mut dyn TreeStorage,
    ) -> Option<Result<StoredTree, StorageError>> {
        if !self.is_due(now) {
            return None;
        }
        self.flush(storage).transpose()
    }

    /// Writes the pending patch immediately.
    ///
    /// On failure the patch stays pending so a later flush can retry it.
    pub fn flush(&mut self, storage: &mut dyn TreeStorage) -> Result<Option<StoredTree>, StorageError> {
        let Some(patch) = self.pending.take() else {
            return Ok(None);
        };

        match storage.update_tree(&self.tree_id, &patch) {
            Ok(stored) => {
                log::debug!("saved tree {}", self.tree_id);
                self.last_change = None;
                Ok(Some(stored))
            }
            Err(e) => {
                log::warn!("saving tree {} failed: {}", self.tree_id, e);
                self.pending = Some(patch);
                Err(e)
            }
        }
    }
}
