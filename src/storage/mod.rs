//! Persistence collaborators.
//!
//! - `adapter`: the `TreeStorage` contract, stored-tree records and patches
//! - `file_store`: one file per tree in a directory
//! - `memory`: an in-memory store
//! - `context`: caller-owned settings and compression statistics
//! - `debounce`: batching rapid edits into one write

pub mod adapter;
pub mod context;
pub mod debounce;
pub mod file_store;
pub mod memory;

pub use adapter::{StorageError, StoredTree, TreePatch, TreeStorage};
pub use context::{CompressionStats, StorageContext};
pub use debounce::DebouncedSaver;
pub use file_store::FileStorage;
pub use memory::MemoryStorage;
