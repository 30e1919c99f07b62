//! Tree document saving.
//!
//! This module provides functions to write `TreeDocument`s to files with
//! atomic write operations, optional backups and optional gzip compression.

use super::loader::{detect_format, DocumentFormat};
use crate::config::Config;
use crate::document::format::TreeDocument;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Creates a backup of a file by copying it with a .bak extension.
pub(crate) fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Saves a document to a file.
///
/// The format follows the extension (`.yaml`/`.yml` → YAML, otherwise
/// JSON); a trailing `.gz` compresses the output.
///
/// # Atomic Write
///
/// The document is written to a temporary file which is then renamed over
/// the target, so the target is never left partially written.
///
/// # Examples
///
/// ```no_run
/// use treequill::config::Config;
/// use treequill::document::format::TreeDocument;
/// use treequill::file::saver::save_document_file;
///
/// let doc = TreeDocument::default();
/// save_document_file("org.json", &doc, &Config::default()).unwrap();
/// ```
pub fn save_document_file<P: AsRef<Path>>(path: P, doc: &TreeDocument, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let compress = path.to_string_lossy().ends_with(".gz");

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let text = match detect_format(path) {
        DocumentFormat::Json => serialize_json(doc, config.indent_size)?,
        DocumentFormat::Yaml => serde_yaml::to_string(doc).context("Failed to serialize YAML")?,
    };

    let bytes = if compress {
        gzip_bytes(text.as_bytes())?
    } else {
        text.into_bytes()
    };
    write_file_atomic(path, &bytes)
}

/// Saves a copy of the document stamped with the export version and the
/// current time.
pub fn export_document_file<P: AsRef<Path>>(path: P, doc: &TreeDocument, config: &Config) -> Result<()> {
    save_document_file(path, &doc.stamped(Utc::now()), config)
}

/// Serializes a value as pretty JSON with the given indentation width.
pub fn serialize_json<T: Serialize>(value: &T, indent_size: usize) -> Result<String> {
    let indent = " ".repeat(indent_size);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;

    let mut text = String::from_utf8(out).context("Serialized JSON is not UTF-8")?;
    text.push('\n');
    Ok(text)
}

/// Compresses bytes with gzip at the default level.
pub(crate) fn gzip_bytes(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("Failed to write compressed data")?;
    encoder.finish().context("Failed to finish compression")
}

/// Writes data to a file atomically via a temp file and rename.
pub(crate) fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, data).context("Failed to write temp file")?;

    // Atomic rename
    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::Node;
    use crate::document::tree::Forest;

    #[test]
    fn test_serialize_json_indent() {
        let doc = TreeDocument::new(Forest::new(vec![Node::new("a", "A")]), vec![], "T");
        let text = serialize_json(&doc, 4).unwrap();
        assert!(text.contains("\n    \"tree\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_gzip_round_trip() {
        let packed = gzip_bytes(b"hello").unwrap();
        assert_eq!(
            crate::file::loader::decompress_gzip_bytes(&packed).unwrap(),
            "hello"
        );
    }
}
