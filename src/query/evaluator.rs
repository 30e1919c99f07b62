use super::ast::{MatchField, Query, SearchResult};
use super::parser::Parser;
use crate::document::node::{Node, NodeType};
use crate::document::tree::Forest;

/// Evaluates queries against a forest, resolving node types from a schema list.
pub struct Evaluator<'a> {
    node_types: &'a [NodeType],
}

impl<'a> Evaluator<'a> {
    pub fn new(node_types: &'a [NodeType]) -> Self {
        Evaluator { node_types }
    }

    /// Parses and evaluates a search string.
    pub fn search(&self, forest: &Forest, input: &str) -> Vec<SearchResult> {
        self.evaluate(forest, &Parser::parse(input))
    }

    /// Evaluates a parsed query and returns matches in pre-order.
    ///
    /// A node matches only if every part of the query holds: the type filter,
    /// each qualifier and the free text. An empty query matches nothing.
    pub fn evaluate(&self, forest: &Forest, query: &Query) -> Vec<SearchResult> {
        if query.is_empty() {
            return vec![];
        }

        let mut results = Vec::new();
        let mut path = Vec::new();
        for root in forest.roots() {
            self.walk(root, query, &mut path, &mut results);
        }
        results
    }

    fn walk(
        &self,
        node: &Node,
        query: &Query,
        path: &mut Vec<String>,
        results: &mut Vec<SearchResult>,
    ) {
        path.push(node.id.clone());

        if let Some((match_field, match_value)) = self.match_node(node, query) {
            results.push(SearchResult {
                node_id: node.id.clone(),
                name: node.name.clone(),
                path: path.clone(),
                match_field,
                match_value,
            });
        }

        for child in &node.children {
            self.walk(child, query, path, results);
        }

        path.pop();
    }

    /// Returns what to report for a matching node, or `None` if it fails
    /// any predicate.
    ///
    /// Reporting priority: the free-text hit, else the first qualifier's
    /// field, else the type name.
    fn match_node(&self, node: &Node, query: &Query) -> Option<(MatchField, String)> {
        let type_hit = match &query.type_filter {
            Some(fragment) => {
                // A dangling type reference counts as untyped
                let node_type = self.resolve_type(node)?;
                if !contains(&node_type.name, fragment) {
                    return None;
                }
                Some((MatchField::Type, node_type.name.clone()))
            }
            None => None,
        };

        let mut qualifier_hit = None;
        for (name_fragment, value_fragment) in &query.qualifiers {
            let field = node.custom_fields.iter().find(|f| {
                contains(&f.name, name_fragment) && contains(&f.value, value_fragment)
            })?;
            if qualifier_hit.is_none() {
                qualifier_hit = Some((MatchField::Field(field.name.clone()), field.value.clone()));
            }
        }

        match &query.text {
            Some(text) => match_text(node, text),
            None => qualifier_hit.or(type_hit),
        }
    }

    fn resolve_type(&self, node: &Node) -> Option<&'a NodeType> {
        let type_id = node.node_type.as_deref()?;
        self.node_types.iter().find(|t| t.id == type_id)
    }
}

/// Matches free text against name, then the icon unless it is a remote URL,
/// then each custom field's name or value. The first hit is reported.
fn match_text(node: &Node, text: &str) -> Option<(MatchField, String)> {
    if contains(&node.name, text) {
        return Some((MatchField::Name, node.name.clone()));
    }

    if let Some(icon) = node.icon.as_ref().filter(|icon| !icon.as_str().starts_with("http")) {
        if contains(icon.as_str(), text) {
            return Some((MatchField::Icon, icon.as_str().to_string()));
        }
    }

    node.custom_fields
        .iter()
        .find(|f| contains(&f.name, text) || contains(&f.value, text))
        .map(|f| (MatchField::Field(f.name.clone()), f.value.clone()))
}

/// Case-insensitive containment; `fragment` is already lowercase.
fn contains(haystack: &str, fragment: &str) -> bool {
    haystack.to_lowercase().contains(fragment)
}

/// Convenience wrapper: search `forest` for `input`.
///
/// Calling it twice with the same inputs yields identical results.
pub fn search(forest: &Forest, node_types: &[NodeType], input: &str) -> Vec<SearchResult> {
    Evaluator::new(node_types).search(forest, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::{CustomField, FieldType, Icon};

    fn people() -> (Forest, Vec<NodeType>) {
        let employee = NodeType::new("emp", "Employee");
        let forest = Forest::new(vec![Node::new("org", "Acme")
            .with_child(
                Node::new("alice", "Alice")
                    .with_node_type("emp")
                    .with_icon(Icon::from("🦊"))
                    .with_custom_field(CustomField::new("f1", "Department", FieldType::Text, "Sales")),
            )
            .with_child(
                Node::new("bob", "Bob")
                    .with_node_type("deleted-type")
                    .with_custom_field(CustomField::new("f2", "Department", FieldType::Text, "Sales")),
            )]);
        (forest, vec![employee])
    }

    #[test]
    fn test_icon_glyph_matches() {
        let (forest, types) = people();
        let results = search(&forest, &types, "🦊");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_field, MatchField::Icon);
    }

    #[test]
    fn test_remote_icon_ignored() {
        let forest = Forest::new(vec![
            Node::new("a", "A").with_icon(Icon::from("https://cdn.example/pic.png"))
        ]);
        assert!(search(&forest, &[], "cdn").is_empty());
    }

    #[test]
    fn test_inline_audio_icon_matches() {
        let forest = Forest::new(vec![
            Node::new("a", "A").with_icon(Icon::from("data:audio/mpeg;base64,SUQz"))
        ]);
        let results = search(&forest, &[], "audio/mpeg");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_field, MatchField::Icon);
    }

    #[test]
    fn test_dangling_type_never_matches_type_filter() {
        let (forest, types) = people();
        let results = search(&forest, &types, "type:e department:sales");
        let ids: Vec<&str> = results.iter().map(|r| r.node_id.as_str()).collect();
        assert_eq!(ids, vec!["alice"]);
    }

    #[test]
    fn test_type_only_reports_type_name() {
        let (forest, types) = people();
        let results = search(&forest, &types, "type:EMPLOY");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_field, MatchField::Type);
        assert_eq!(results[0].match_value, "Employee");
    }
}
