//! Caller-owned storage settings and statistics.

use crate::config::Config;

/// Running totals of what storage has written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub writes: u64,
    /// Bytes before compression
    pub raw_bytes: u64,
    /// Bytes actually written
    pub stored_bytes: u64,
}

impl CompressionStats {
    pub fn record(&mut self, raw: usize, stored: usize) {
        self.writes += 1;
        self.raw_bytes += raw as u64;
        self.stored_bytes += stored as u64;
    }

    /// Stored size as a fraction of raw size; 1.0 before any write.
    pub fn ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            1.0
        } else {
            self.stored_bytes as f64 / self.raw_bytes as f64
        }
    }
}

/// Settings and statistics for one storage adapter instance.
///
/// Constructed by the caller and handed to the adapter; there is no
/// process-wide instance.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageContext {
    pub compress: bool,
    pub create_backup: bool,
    pub indent_size: usize,
    pub stats: CompressionStats,
}

impl Default for StorageContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl StorageContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            compress: config.compress,
            create_backup: config.create_backup,
            indent_size: config.indent_size,
            stats: CompressionStats::default(),
        }
    }
}
