//! Editor state management.
//!
//! This module provides the `EditorState` struct that owns everything one
//! editing session works on: the authoritative forest, the node-type schemas,
//! the document title, the dirty flag, and the live search (query, results,
//! selected result).
//!
//! Every edit goes through the pure functions in `mutation` and `schema`,
//! and the new forest is swapped in only when it differs from the current
//! one. After each swap the search is re-run, so results always describe the
//! current forest. Display concerns (focus filtering, ancestor expansion)
//! are derived on demand and never written back to the forest.
//!
//! # Example
//!
//! ```
//! use treequill::document::format::TreeDocument;
//! use treequill::document::ids::SequentialIds;
//! use treequill::editor::state::EditorState;
//!
//! let mut state = EditorState::with_ids(TreeDocument::default(), Box::new(SequentialIds::new("n")));
//! let root = state.add_node("Company", None, None).unwrap();
//! let sales = state.add_node("Sales", Some(root.as_str()), None).unwrap();
//! assert!(state.is_dirty());
//!
//! state.set_query("sales");
//! assert_eq!(state.results().len(), 1);
//! assert!(state.focus_mode());
//! assert_eq!(state.results()[0].path, vec![root, sales]);
//! ```

use super::mutation;
use super::placement::Placement;
use crate::document::error::ImportError;
use crate::document::format::TreeDocument;
use crate::document::ids::{IdGenerator, UuidGenerator};
use crate::document::node::{CustomField, FieldDefinition, FieldType, Icon, Node, NodeType};
use crate::document::parser::parse_document;
use crate::document::tree::Forest;
use crate::query::{search, SearchResult};
use crate::schema::reconcile;
use crate::storage::TreePatch;
use crate::view::projection::Projection;
use crate::view::rows::{visible_rows, TreeRow};
use std::collections::HashSet;

pub struct EditorState {
    forest: Forest,
    node_types: Vec<NodeType>,
    title: String,
    dirty: bool,
    query: String,
    results: Vec<SearchResult>,
    selected: usize,
    auto_expand_results: bool,
    ids: Box<dyn IdGenerator>,
}

impl EditorState {
    /// Creates a session over a document, generating UUIDs for new items.
    pub fn new(document: TreeDocument) -> Self {
        Self::with_ids(document, Box::new(UuidGenerator))
    }

    /// Creates a session with a specific id generator.
    pub fn with_ids(document: TreeDocument, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            forest: document.tree,
            node_types: document.node_types,
            title: document.tree_title,
            dirty: false,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            auto_expand_results: true,
            ids,
        }
    }

    /// Returns the authoritative forest.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    pub fn node_type(&self, id: &str) -> Option<&NodeType> {
        self.node_types.iter().find(|t| t.id == id)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title != self.title {
            self.title = title;
            self.dirty = true;
        }
    }

    /// Returns true if there are changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn set_auto_expand_results(&mut self, enabled: bool) {
        self.auto_expand_results = enabled;
    }

    /// Snapshots the session as a document.
    pub fn to_document(&self) -> TreeDocument {
        TreeDocument::new(self.forest.clone(), self.node_types.clone(), self.title.clone())
    }

    /// A storage patch carrying the whole current document.
    pub fn to_patch(&self) -> TreePatch {
        TreePatch::full(&self.to_document())
    }

    /// Replaces the session's content with a loaded document.
    pub fn load_document(&mut self, document: TreeDocument) {
        self.forest = document.tree;
        self.node_types = document.node_types;
        self.title = document.tree_title;
        self.dirty = false;
        self.recompute();
    }

    /// Imports a JSON document, replacing the current content.
    ///
    /// On a validation failure nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let document = parse_document(json)?;
        self.load_document(document);
        self.dirty = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Adds a node and returns its new id, or `None` if the generated id
    /// was already taken and the node was refused.
    ///
    /// A type id that resolves seeds the node with one empty field per
    /// definition; an unknown type id is ignored.
    pub fn add_node(
        &mut self,
        name: &str,
        parent_id: Option<&str>,
        node_type_id: Option<&str>,
    ) -> Option<String> {
        let node = match node_type_id.and_then(|id| self.node_type(id)).cloned() {
            Some(node_type) => Node::typed(self.ids.as_mut(), name, &node_type),
            None => Node::generated(self.ids.as_mut(), name),
        };
        let id = node.id.clone();
        self.insert_node(node, parent_id).then_some(id)
    }

    /// Adds a caller-built node. Returns false if it was refused.
    pub fn insert_node(&mut self, node: Node, parent_id: Option<&str>) -> bool {
        let next = mutation::add_node(&self.forest, node, parent_id);
        self.commit(next)
    }

    pub fn delete_node(&mut self, id: &str) -> bool {
        let next = mutation::delete_node(&self.forest, id);
        self.commit(next)
    }

    pub fn rename_node(&mut self, id: &str, name: &str) -> bool {
        let next = mutation::rename_node(&self.forest, id, name);
        self.commit(next)
    }

    pub fn toggle_expand(&mut self, id: &str) -> bool {
        let next = mutation::toggle_expand(&self.forest, id);
        self.commit(next)
    }

    pub fn set_icon(&mut self, id: &str, icon: Option<Icon>) -> bool {
        let next = mutation::set_icon(&self.forest, id, icon);
        self.commit(next)
    }

    /// Moves a node. Returns false if the move was refused.
    pub fn move_node(&mut self, source_id: &str, target_id: &str, placement: Placement) -> bool {
        let next = mutation::move_node(&self.forest, source_id, target_id, placement);
        self.commit(next)
    }

    /// Assigns a node type by id, or clears it with `None`.
    ///
    /// An unknown type id is a no-op.
    pub fn set_node_type(&mut self, id: &str, node_type_id: Option<&str>) -> bool {
        let node_type = match node_type_id {
            Some(type_id) => match self.node_type(type_id) {
                Some(node_type) => Some(node_type.clone()),
                None => return false,
            },
            None => None,
        };
        let next = mutation::set_node_type(&self.forest, id, node_type.as_ref(), self.ids.as_mut());
        self.commit(next)
    }

    /// Adds a free-form field to a node and returns the field id.
    pub fn add_custom_field(&mut self, node_id: &str, name: &str, field_type: FieldType) -> Option<String> {
        self.forest.get(node_id)?;
        let field = CustomField::new(self.ids.next_id(), name, field_type, "");
        let field_id = field.id.clone();
        let next = mutation::add_custom_field(&self.forest, node_id, field);
        self.commit(next);
        Some(field_id)
    }

    pub fn update_custom_field_value(&mut self, node_id: &str, field_id: &str, value: &str) -> bool {
        let next = mutation::update_custom_field_value(&self.forest, node_id, field_id, value);
        self.commit(next)
    }

    pub fn remove_custom_field(&mut self, node_id: &str, field_id: &str) -> bool {
        let next = mutation::remove_custom_field(&self.forest, node_id, field_id);
        self.commit(next)
    }

    // ------------------------------------------------------------------
    // Node types
    // ------------------------------------------------------------------

    /// Adds a node type and returns its id.
    pub fn add_node_type(&mut self, name: &str, definitions: Vec<FieldDefinition>) -> String {
        let mut node_type = NodeType::new(self.ids.next_id(), name);
        node_type.field_definitions = definitions;
        let id = node_type.id.clone();
        self.node_types.push(node_type);
        self.dirty = true;
        self.recompute();
        id
    }

    pub fn rename_node_type(&mut self, type_id: &str, name: &str) -> bool {
        match self.node_types.iter_mut().find(|t| t.id == type_id) {
            Some(node_type) if node_type.name != name => {
                node_type.name = name.to_string();
                self.dirty = true;
                // Type names take part in `type:` queries
                self.recompute();
                true
            }
            _ => false,
        }
    }

    /// Replaces a node type's field definitions and reconciles every node of
    /// that type with the change.
    pub fn update_node_type_definitions(&mut self, type_id: &str, definitions: Vec<FieldDefinition>) -> bool {
        let Some(index) = self.node_types.iter().position(|t| t.id == type_id) else {
            return false;
        };

        let previous = std::mem::replace(
            &mut self.node_types[index].field_definitions,
            definitions,
        );
        let next = reconcile(
            &self.forest,
            type_id,
            &previous,
            &self.node_types[index].field_definitions,
            self.ids.as_mut(),
        );
        self.forest = next;
        self.dirty = true;
        self.recompute();
        true
    }

    /// Deletes a node type. Nodes referencing it keep the dangling reference
    /// and are treated as untyped.
    pub fn delete_node_type(&mut self, type_id: &str) -> bool {
        let before = self.node_types.len();
        self.node_types.retain(|t| t.id != type_id);
        if self.node_types.len() == before {
            return false;
        }
        self.dirty = true;
        self.recompute();
        true
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Sets the search string and re-runs the search, selecting the first result.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.selected = 0;
        self.recompute();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Clears the search string and all results.
    pub fn clear_search(&mut self) {
        self.set_query("");
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.selected)
    }

    /// Selects a result by index. Returns false if out of range.
    pub fn select_result(&mut self, index: usize) -> bool {
        if index < self.results.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Selects the next result, wrapping at the end.
    /// Returns (success, wrapped).
    pub fn select_next(&mut self) -> (bool, bool) {
        if self.results.is_empty() {
            return (false, false);
        }
        let old_index = self.selected;
        self.selected = (self.selected + 1) % self.results.len();
        (true, self.selected < old_index)
    }

    /// Selects the previous result, wrapping at the start.
    /// Returns (success, wrapped).
    pub fn select_previous(&mut self) -> (bool, bool) {
        if self.results.is_empty() {
            return (false, false);
        }
        let wrapped = self.selected == 0;
        self.selected = if wrapped {
            self.results.len() - 1
        } else {
            self.selected - 1
        };
        (true, wrapped)
    }

    /// Focus mode is on whenever the current search has results.
    pub fn focus_mode(&self) -> bool {
        !self.results.is_empty()
    }

    /// Ids on the selected result's path.
    pub fn highlighted_path(&self) -> HashSet<String> {
        self.projection().highlighted
    }

    pub fn projection(&self) -> Projection {
        Projection::compute(&self.results, self.selected)
    }

    /// The forest as it should be displayed; never persisted.
    pub fn display_forest(&self) -> Forest {
        self.projection()
            .apply(&self.forest, self.auto_expand_results)
    }

    /// Rows a renderer should draw for the current display forest.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let projection = self.projection();
        let display = projection.apply(&self.forest, self.auto_expand_results);
        visible_rows(&display, &projection)
    }

    /// Swaps in an edited forest if it differs from the current one.
    fn commit(&mut self, next: Forest) -> bool {
        if next == self.forest {
            return false;
        }
        self.forest = next;
        self.dirty = true;
        self.recompute();
        true
    }

    /// Re-runs the search against the current forest and keeps the selection
    /// in range.
    fn recompute(&mut self) {
        self.results = search(&self.forest, &self.node_types, &self.query);
        if self.selected >= self.results.len() {
            self.selected = self.results.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ids::SequentialIds;

    fn state() -> EditorState {
        EditorState::with_ids(TreeDocument::default(), Box::new(SequentialIds::new("id")))
    }

    #[test]
    fn test_refused_edit_keeps_clean() {
        let mut state = state();
        assert!(!state.rename_node("missing", "x"));
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_selection_clamped_after_delete() {
        let mut state = state();
        let a = state.add_node("match one", None, None).unwrap();
        let b = state.add_node("match two", None, None).unwrap();
        state.set_query("match");
        state.select_result(1);

        state.delete_node(&b);
        assert_eq!(state.results().len(), 1);
        assert_eq!(state.selected_index(), 0);
        assert_eq!(state.selected_result().unwrap().node_id, a);
    }

    #[test]
    fn test_add_node_with_taken_id_returns_none() {
        let mut state = state();
        state.insert_node(Node::new("id1", "Squatter"), None);
        state.clear_dirty();

        assert_eq!(state.add_node("Fresh", None, None), None);
        assert_eq!(state.forest().node_count(), 1);
        assert_eq!(state.forest().get("id1").unwrap().name, "Squatter");
        assert!(!state.is_dirty());

        assert_eq!(state.add_node("Fresh", None, None).as_deref(), Some("id2"));
    }

    #[test]
    fn test_select_wraps() {
        let mut state = state();
        state.add_node("x1", None, None);
        state.add_node("x2", None, None);
        state.set_query("x");

        assert_eq!(state.select_previous(), (true, true));
        assert_eq!(state.selected_index(), 1);
        assert_eq!(state.select_next(), (true, true));
        assert_eq!(state.selected_index(), 0);
    }
}
