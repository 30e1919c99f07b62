//! Node, node-type and custom-field representation.
//!
//! This module provides the core data structures for representing a labeled
//! forest in treequill. Every `Node` carries a globally unique id, a display
//! name, its ordered children and an ordered list of `CustomField`s. A node may
//! reference a `NodeType` by id; the type's `FieldDefinition`s describe which
//! custom fields a node of that type is expected to carry.
//!
//! The serialized form uses camelCase keys (`isExpanded`, `nodeType`,
//! `customFields`, `fieldDefinitions`, `definitionId`) so documents round-trip
//! with the JSON export format.
//!
//! # Example
//!
//! ```
//! use treequill::document::node::{CustomField, FieldType, Icon, Node};
//!
//! let node = Node::new("n1", "Alice")
//!     .with_icon(Icon::from("👩"))
//!     .with_custom_field(CustomField::new("f1", "Department", FieldType::Text, "Sales"));
//!
//! assert!(node.icon.as_ref().unwrap().is_glyph());
//! assert_eq!(node.custom_fields[0].value, "Sales");
//! assert!(!node.is_expanded());
//! ```

use super::ids::IdGenerator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node icon, classified once from its string form.
///
/// The string form decides the variant by prefix: `http` is a remote image,
/// `data:image/` an inline image, `data:audio/` inline audio, and anything
/// else a literal glyph (usually an emoji).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Icon {
    /// A short literal glyph such as an emoji
    Glyph(String),
    /// An `http(s)` image URL
    RemoteImage(String),
    /// A base64 `data:image/...` URI
    InlineImage(String),
    /// A base64 `data:audio/...` URI
    InlineAudio(String),
}

impl Icon {
    /// Returns the original string form of the icon.
    pub fn as_str(&self) -> &str {
        match self {
            Icon::Glyph(s) | Icon::RemoteImage(s) | Icon::InlineImage(s) | Icon::InlineAudio(s) => {
                s
            }
        }
    }

    /// Returns true if this icon is a literal glyph.
    pub fn is_glyph(&self) -> bool {
        matches!(self, Icon::Glyph(_))
    }
}

impl From<String> for Icon {
    fn from(raw: String) -> Self {
        if raw.starts_with("http") {
            Icon::RemoteImage(raw)
        } else if raw.starts_with("data:image/") {
            Icon::InlineImage(raw)
        } else if raw.starts_with("data:audio/") {
            Icon::InlineAudio(raw)
        } else {
            Icon::Glyph(raw)
        }
    }
}

impl From<&str> for Icon {
    fn from(raw: &str) -> Self {
        Icon::from(raw.to_string())
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        match icon {
            Icon::Glyph(s) | Icon::RemoteImage(s) | Icon::InlineImage(s) | Icon::InlineAudio(s) => {
                s
            }
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of content a custom field holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text
    #[default]
    Text,
    /// Multi-line text
    Textarea,
    /// A hyperlink
    Link,
    /// A YouTube video URL
    Youtube,
    /// Image data (URL or data URI)
    Image,
    /// Audio data (URL or data URI)
    Audio,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Link => "link",
            FieldType::Youtube => "youtube",
            FieldType::Image => "image",
            FieldType::Audio => "audio",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field declared by a `NodeType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A node-type schema: a named, ordered list of field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeType {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub field_definitions: Vec<FieldDefinition>,
}

impl NodeType {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            field_definitions: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_definition(mut self, definition: FieldDefinition) -> Self {
        self.field_definitions.push(definition);
        self
    }

    /// Looks up a field definition by id.
    pub fn definition(&self, id: &str) -> Option<&FieldDefinition> {
        self.field_definitions.iter().find(|d| d.id == id)
    }
}

/// A custom field value stored on a node.
///
/// `field_type` is copied from the definition when the field is created and
/// may drift if the definition later changes; only reconciliation realigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_id: Option<String>,
}

impl CustomField {
    /// Creates a free-form field that is not bound to any definition.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        field_type: FieldType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
            field_type,
            definition_id: None,
        }
    }

    /// Creates an empty field instance for a definition.
    pub fn from_definition(definition: &FieldDefinition, ids: &mut dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            name: definition.name.clone(),
            value: String::new(),
            field_type: definition.field_type,
            definition_id: Some(definition.id.clone()),
        }
    }

    pub fn with_definition_id(mut self, definition_id: impl Into<String>) -> Self {
        self.definition_id = Some(definition_id.into());
        self
    }

    /// Returns the id used to match this field against a definition.
    ///
    /// Legacy fields written before `definitionId` existed used the
    /// definition id as their own id.
    pub fn definition_key(&self) -> &str {
        self.definition_id.as_deref().unwrap_or(&self.id)
    }
}

/// A single element of the forest.
///
/// A node exclusively owns its children; moving a node transfers the whole
/// subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl Node {
    /// Creates a leaf node with no type, icon or fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
            is_expanded: None,
            icon: None,
            node_type: None,
            custom_fields: Vec::new(),
        }
    }

    /// Creates a leaf node with a freshly generated id.
    pub fn generated(ids: &mut dyn IdGenerator, name: impl Into<String>) -> Self {
        Self::new(ids.next_id(), name)
    }

    /// Creates a node of the given type with one empty field per definition.
    pub fn typed(ids: &mut dyn IdGenerator, name: impl Into<String>, node_type: &NodeType) -> Self {
        let mut node = Self::generated(ids, name);
        node.node_type = Some(node_type.id.clone());
        node.custom_fields = node_type
            .field_definitions
            .iter()
            .map(|definition| CustomField::from_definition(definition, ids))
            .collect();
        node
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_custom_field(mut self, field: CustomField) -> Self {
        self.custom_fields.push(field);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = Some(expanded);
        self
    }

    /// Returns the expansion flag, treating an unset flag as collapsed.
    pub fn is_expanded(&self) -> bool {
        self.is_expanded.unwrap_or(false)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true if `id` names this node or any node below it.
    pub fn contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|child| child.contains(id))
    }

    /// Collects the ids of this node and its whole subtree in pre-order.
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<String>) {
        ids.push(self.id.clone());
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    /// Finds a custom field by its instance id.
    pub fn custom_field(&self, field_id: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.id == field_id)
    }
}
