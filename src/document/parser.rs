//! Validating document import.
//!
//! This module turns JSON or YAML text into a `TreeDocument`, checking the
//! structure before anything is decoded so a malformed document is reported
//! with a precise location (`tree[0].children[2]`) instead of a generic decode
//! error. Import either yields a complete document or an `ImportError`; there
//! is no partial result.
//!
//! Checks performed:
//! - the top level is an object with a `tree` array
//! - every node is an object with a string `id`, a string `name` and a
//!   `children` array (possibly empty)
//! - every node type has an `id` and a `name`
//! - node ids are unique across the whole forest
//!
//! Node-type references that do not resolve are tolerated and only logged.
//!
//! # Example
//!
//! ```
//! use treequill::document::parser::parse_document;
//!
//! let json = r#"{"tree": [{"id": "a", "name": "A", "children": []}], "treeTitle": "Demo"}"#;
//! let doc = parse_document(json).unwrap();
//! assert_eq!(doc.tree_title, "Demo");
//!
//! let err = parse_document(r#"{"tree": [{"id": "a", "children": []}]}"#).unwrap_err();
//! assert_eq!(err.to_string(), "tree[0]: missing required field `name`");
//! ```

use super::error::ImportError;
use super::format::TreeDocument;
use serde_json::Value;

/// Parses and validates a JSON document.
pub fn parse_document(json: &str) -> Result<TreeDocument, ImportError> {
    let value: Value = serde_json::from_str(json).map_err(|e| ImportError::Syntax {
        format: "JSON",
        message: e.to_string(),
    })?;
    validate_document(value)
}

/// Parses and validates a YAML document.
pub fn parse_yaml_document(yaml: &str) -> Result<TreeDocument, ImportError> {
    let value: Value = serde_yaml::from_str(yaml).map_err(|e| ImportError::Syntax {
        format: "YAML",
        message: e.to_string(),
    })?;
    validate_document(value)
}

/// Validates an already parsed value and decodes it into a document.
pub fn validate_document(value: Value) -> Result<TreeDocument, ImportError> {
    let top = value.as_object().ok_or_else(|| ImportError::InvalidType {
        location: "document".to_string(),
        expected: "an object",
    })?;

    let tree = top.get("tree").ok_or_else(|| ImportError::MissingField {
        location: "document".to_string(),
        field: "tree",
    })?;
    let roots = tree.as_array().ok_or_else(|| ImportError::InvalidType {
        location: "tree".to_string(),
        expected: "an array of nodes",
    })?;
    for (index, node) in roots.iter().enumerate() {
        check_node(node, &format!("tree[{}]", index))?;
    }

    if let Some(node_types) = top.get("nodeTypes") {
        let node_types = node_types.as_array().ok_or_else(|| ImportError::InvalidType {
            location: "nodeTypes".to_string(),
            expected: "an array of node types",
        })?;
        for (index, node_type) in node_types.iter().enumerate() {
            check_node_type(node_type, &format!("nodeTypes[{}]", index))?;
        }
    }

    let document: TreeDocument =
        serde_json::from_value(value).map_err(|e| ImportError::Shape(e.to_string()))?;

    if let Some(duplicate) = document.tree.duplicate_ids().into_iter().next() {
        return Err(ImportError::DuplicateId(duplicate));
    }

    for (node_id, type_id) in document.dangling_type_refs() {
        log::warn!(
            "node {} references unknown node type {}; treating it as untyped",
            node_id,
            type_id
        );
    }

    Ok(document)
}

fn check_node(node: &Value, location: &str) -> Result<(), ImportError> {
    let object = node.as_object().ok_or_else(|| ImportError::InvalidType {
        location: location.to_string(),
        expected: "a node object",
    })?;

    require_string(object, "id", location)?;
    require_string(object, "name", location)?;

    let children = object
        .get("children")
        .ok_or_else(|| ImportError::MissingField {
            location: location.to_string(),
            field: "children",
        })?
        .as_array()
        .ok_or_else(|| ImportError::InvalidType {
            location: format!("{}.children", location),
            expected: "an array",
        })?;

    for (index, child) in children.iter().enumerate() {
        check_node(child, &format!("{}.children[{}]", location, index))?;
    }
    Ok(())
}

fn check_node_type(node_type: &Value, location: &str) -> Result<(), ImportError> {
    let object = node_type.as_object().ok_or_else(|| ImportError::InvalidType {
        location: location.to_string(),
        expected: "a node type object",
    })?;
    require_string(object, "id", location)?;
    require_string(object, "name", location)?;

    if let Some(definitions) = object.get("fieldDefinitions") {
        let definitions = definitions.as_array().ok_or_else(|| ImportError::InvalidType {
            location: format!("{}.fieldDefinitions", location),
            expected: "an array",
        })?;
        for (index, definition) in definitions.iter().enumerate() {
            let location = format!("{}.fieldDefinitions[{}]", location, index);
            let definition = definition.as_object().ok_or_else(|| ImportError::InvalidType {
                location: location.clone(),
                expected: "a field definition object",
            })?;
            require_string(definition, "id", &location)?;
            require_string(definition, "name", &location)?;
        }
    }
    Ok(())
}

fn require_string(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
    location: &str,
) -> Result<(), ImportError> {
    match object.get(field) {
        None => Err(ImportError::MissingField {
            location: location.to_string(),
            field,
        }),
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ImportError::InvalidType {
            location: format!("{}.{}", location, field),
            expected: "a string",
        }),
    }
}
