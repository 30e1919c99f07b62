//! Directory-backed tree storage.
//!
//! Each tree lives in its own file, `<id>.json` or `<id>.json.gz` when the
//! context asks for compression. Writes go through a temp file and a rename
//! so a crash never leaves a half-written tree behind.

use super::adapter::{StorageError, StoredTree, TreePatch, TreeStorage};
use super::context::StorageContext;
use crate::document::format::TreeDocument;
use crate::document::ids::{IdGenerator, UuidGenerator};
use crate::file::loader::decompress_gzip_bytes;
use crate::file::saver::{create_backup, gzip_bytes, serialize_json, write_file_atomic};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

const PLAIN_SUFFIX: &str = ".json";
const GZIP_SUFFIX: &str = ".json.gz";

pub struct FileStorage {
    dir: PathBuf,
    context: StorageContext,
    ids: Box<dyn IdGenerator>,
}

impl FileStorage {
    /// Opens (creating if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>, context: StorageContext) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            context,
            ids: Box::new(UuidGenerator),
        })
    }

    /// Replaces the generator used for new tree ids.
    pub fn with_ids(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn context(&self) -> &StorageContext {
        &self.context
    }

    /// Returns the existing file for `id`, whichever encoding it uses.
    fn existing_path(&self, id: &str) -> Option<PathBuf> {
        if !is_safe_id(id) {
            return None;
        }
        [GZIP_SUFFIX, PLAIN_SUFFIX]
            .iter()
            .map(|suffix| self.dir.join(format!("{}{}", id, suffix)))
            .find(|path| path.exists())
    }

    fn target_path(&self, id: &str) -> PathBuf {
        let suffix = if self.context.compress {
            GZIP_SUFFIX
        } else {
            PLAIN_SUFFIX
        };
        self.dir.join(format!("{}{}", id, suffix))
    }

    fn read(&self, id: &str, path: &Path) -> Result<StoredTree, StorageError> {
        let bytes = fs::read(path)?;
        let corrupt = |reason: String| StorageError::Corrupt {
            id: id.to_string(),
            reason,
        };
        let text = if path.to_string_lossy().ends_with(GZIP_SUFFIX) {
            decompress_gzip_bytes(&bytes).map_err(|e| corrupt(format!("{:#}", e)))?
        } else {
            String::from_utf8(bytes).map_err(|e| corrupt(e.to_string()))?
        };
        serde_json::from_str(&text).map_err(|e| corrupt(e.to_string()))
    }

    fn write(&mut self, stored: &StoredTree) -> Result<(), StorageError> {
        let target = self.target_path(&stored.id);
        let previous = self.existing_path(&stored.id);

        if self.context.create_backup {
            if let Some(previous) = &previous {
                create_backup(previous).map_err(unavailable)?;
            }
        }

        let text = serialize_json(stored, self.context.indent_size).map_err(unavailable)?;
        let raw_len = text.len();
        let bytes = if self.context.compress {
            gzip_bytes(text.as_bytes()).map_err(unavailable)?
        } else {
            text.into_bytes()
        };

        write_file_atomic(&target, &bytes).map_err(unavailable)?;
        self.context.stats.record(raw_len, bytes.len());

        // The compression setting changed since the last write
        if let Some(previous) = previous {
            if previous != target {
                fs::remove_file(previous)?;
            }
        }
        Ok(())
    }
}

impl TreeStorage for FileStorage {
    fn get_trees(&self) -> Result<Vec<StoredTree>, StorageError> {
        let mut trees = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let id = name
                .strip_suffix(GZIP_SUFFIX)
                .or_else(|| name.strip_suffix(PLAIN_SUFFIX));
            if let Some(id) = id {
                trees.push(self.read(id, &path)?);
            }
        }
        trees.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(trees)
    }

    fn get_tree(&self, id: &str) -> Result<Option<StoredTree>, StorageError> {
        match self.existing_path(id) {
            Some(path) => self.read(id, &path).map(Some),
            None => Ok(None),
        }
    }

    fn create_tree(&mut self, document: TreeDocument) -> Result<StoredTree, StorageError> {
        let stored = StoredTree::new(self.ids.next_id(), document, Utc::now());
        self.write(&stored)?;
        log::debug!("created tree {} in {}", stored.id, self.dir.display());
        Ok(stored)
    }

    fn update_tree(&mut self, id: &str, patch: &TreePatch) -> Result<StoredTree, StorageError> {
        let mut stored = self
            .get_tree(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        patch.apply_to(&mut stored.document);
        stored.updated_at = Utc::now();
        self.write(&stored)?;
        Ok(stored)
    }

    fn delete_tree(&mut self, id: &str) -> Result<(), StorageError> {
        let path = self
            .existing_path(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Ids become file names; anything that could escape the directory is refused.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn unavailable(error: anyhow::Error) -> StorageError {
    StorageError::Unavailable(format!("{:#}", error))
}
