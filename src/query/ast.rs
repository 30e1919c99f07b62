//! Structured search query types.

use indexmap::IndexMap;
use std::fmt;

/// A parsed search query.
///
/// All fragments are stored lowercased; matching is case-insensitive
/// substring containment throughout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Fragment of the node-type name (`type:<fragment>`)
    pub type_filter: Option<String>,
    /// Field-name fragment to value fragment (`<name>:<value>`), in first-seen order
    pub qualifiers: IndexMap<String, String>,
    /// Remaining free text, if any
    pub text: Option<String>,
}

impl Query {
    /// Returns true if the query constrains nothing and therefore matches nothing.
    pub fn is_empty(&self) -> bool {
        self.type_filter.is_none() && self.qualifiers.is_empty() && self.text.is_none()
    }
}

/// Which attribute of a node satisfied a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchField {
    /// The node name
    Name,
    /// The node's icon
    Icon,
    /// The resolved node-type name
    Type,
    /// A custom field, identified by its name
    Field(String),
}

impl MatchField {
    pub fn as_str(&self) -> &str {
        match self {
            MatchField::Name => "name",
            MatchField::Icon => "icon",
            MatchField::Type => "type",
            MatchField::Field(name) => name,
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node matched by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub node_id: String,
    pub name: String,
    /// Ids from a root down to and including the matched node
    pub path: Vec<String>,
    pub match_field: MatchField,
    /// The original (not lowercased) text that matched
    pub match_value: String,
}
