//! Tree document loading.
//!
//! This module provides functions to load tree documents from files or stdin,
//! validating them into `TreeDocument`s. JSON and YAML are supported, each
//! optionally gzip-compressed.

use crate::document::format::TreeDocument;
use crate::document::parser::{parse_document, parse_yaml_document};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// On-disk encoding of a document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

/// Determines the format from a file name, ignoring a trailing `.gz`.
///
/// Examples:
/// - `org.json` → Json
/// - `org.yaml.gz` → Yaml
/// - `org` → Json
pub fn detect_format<P: AsRef<Path>>(path: P) -> DocumentFormat {
    let path_str = path.as_ref().to_string_lossy();
    let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

    if base.ends_with(".yaml") || base.ends_with(".yml") {
        DocumentFormat::Yaml
    } else {
        DocumentFormat::Json
    }
}

/// Returns true if the file name ends in `.gz`.
pub fn is_gzipped<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

/// Loads and validates a tree document from the filesystem.
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read
/// - A `.gz` file is not valid gzip
/// - The contents fail import validation (the error chain carries the
///   `ImportError` with its location)
///
/// # Examples
///
/// ```no_run
/// use treequill::file::loader::load_document_file;
///
/// let doc = load_document_file("org.json").unwrap();
/// println!("{} root(s)", doc.tree.roots().len());
/// ```
pub fn load_document_file<P: AsRef<Path>>(path: P) -> Result<TreeDocument> {
    let path_ref = path.as_ref();

    let content = if is_gzipped(path_ref) {
        let bytes = fs::read(path_ref).context("Failed to read file")?;
        decompress_gzip_bytes(&bytes).context("Failed to decompress gzipped file")?
    } else {
        fs::read_to_string(path_ref).context("Failed to read file")?
    };

    parse_content(&content, detect_format(path_ref))
        .with_context(|| format!("Failed to import {}", path_ref.display()))
}

/// Loads a tree document from standard input.
///
/// Gzip input is detected by its magic bytes. JSON is tried first, then YAML.
pub fn load_document_from_stdin() -> Result<TreeDocument> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    load_document_from_bytes(&buffer)
}

/// Parses a document from raw bytes, sniffing gzip and JSON/YAML.
pub fn load_document_from_bytes(bytes: &[u8]) -> Result<TreeDocument> {
    // Check for gzip magic bytes (0x1f 0x8b)
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in input")?
    };

    match parse_document(&content) {
        Ok(doc) => Ok(doc),
        // Only fall back to YAML when the input is not JSON at all
        Err(crate::document::error::ImportError::Syntax { .. }) => {
            parse_yaml_document(&content).context("Input is neither a valid JSON nor YAML document")
        }
        Err(e) => Err(e.into()),
    }
}

fn parse_content(content: &str, format: DocumentFormat) -> Result<TreeDocument> {
    let doc = match format {
        DocumentFormat::Json => parse_document(content)?,
        DocumentFormat::Yaml => parse_yaml_document(content)?,
    };
    Ok(doc)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not valid gzip format
/// - The decompressed content is not valid UTF-8
pub(crate) fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzip data - it may be corrupted")?;
    Ok(content)
}
