use pretty_assertions::assert_eq;
use treequill::document::format::TreeDocument;
use treequill::document::ids::SequentialIds;
use treequill::document::node::{FieldDefinition, FieldType};
use treequill::editor::placement::Placement;
use treequill::editor::state::EditorState;

fn state() -> EditorState {
    EditorState::with_ids(TreeDocument::default(), Box::new(SequentialIds::new("id")))
}

/// Company[Sales[Kim, Lee], Engineering[Ana]] with an Employee type.
fn org_state() -> (EditorState, String) {
    let mut state = state();
    let employee = state.add_node_type(
        "Employee",
        vec![FieldDefinition::new("d-dept", "Department", FieldType::Text)],
    );
    let company = state.add_node("Company", None, None).unwrap();
    let sales = state.add_node("Sales", Some(company.as_str()), None).unwrap();
    let engineering = state.add_node("Engineering", Some(company.as_str()), None).unwrap();
    for (name, parent, dept) in [
        ("Kim", &sales, "Sales"),
        ("Lee", &sales, "Sales"),
        ("Ana", &engineering, "Engineering"),
    ] {
        let id = state
            .add_node(name, Some(parent.as_str()), Some(employee.as_str()))
            .unwrap();
        let field_id = state.forest().get(&id).unwrap().custom_fields[0].id.clone();
        state.update_custom_field_value(&id, &field_id, dept);
    }
    state.clear_dirty();
    (state, employee)
}

fn node_id(state: &EditorState, name: &str) -> String {
    state
        .forest()
        .iter()
        .find(|n| n.name == name)
        .map(|n| n.id.clone())
        .unwrap()
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_edits_mark_dirty() {
    let (mut state, _) = org_state();
    assert!(!state.is_dirty());

    let kim = node_id(&state, "Kim");
    assert!(state.rename_node(&kim, "Kimberly"));

    assert!(state.is_dirty());
    assert_eq!(state.forest().get(&kim).unwrap().name, "Kimberly");
}

#[test]
fn test_typed_node_gets_definition_fields() {
    let (state, employee) = org_state();

    let kim = state.forest().get(&node_id(&state, "Kim")).unwrap();

    assert_eq!(kim.node_type.as_deref(), Some(employee.as_str()));
    assert_eq!(kim.custom_fields[0].name, "Department");
    assert_eq!(kim.custom_fields[0].definition_id.as_deref(), Some("d-dept"));
    assert_eq!(kim.custom_fields[0].value, "Sales");
}

#[test]
fn test_unknown_type_id_adds_untyped_node() {
    let mut state = state();

    let id = state.add_node("Loose", None, Some("nope")).unwrap();

    assert_eq!(state.forest().get(&id).unwrap().node_type, None);
}

#[test]
fn test_rejected_move_changes_nothing() {
    let (mut state, _) = org_state();
    let company = node_id(&state, "Company");
    let kim = node_id(&state, "Kim");
    let before = state.forest().clone();

    assert!(!state.move_node(&company, &kim, Placement::Inside));

    assert_eq!(state.forest(), &before);
    assert!(!state.is_dirty());
}

#[test]
fn test_move_between_parents() {
    let (mut state, _) = org_state();
    let ana = node_id(&state, "Ana");
    let lee = node_id(&state, "Lee");

    assert!(state.move_node(&ana, &lee, Placement::After));

    let sales = state.forest().get(&node_id(&state, "Sales")).unwrap();
    let names: Vec<&str> = sales.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Kim", "Lee", "Ana"]);
}

#[test]
fn test_custom_field_lifecycle() {
    let (mut state, _) = org_state();
    let company = node_id(&state, "Company");

    let field = state
        .add_custom_field(&company, "Website", FieldType::Link)
        .unwrap();
    assert!(state.update_custom_field_value(&company, &field, "https://example.com"));
    assert_eq!(
        state.forest().get(&company).unwrap().custom_field(&field).unwrap().value,
        "https://example.com"
    );
    assert!(state.remove_custom_field(&company, &field));
    assert!(state.forest().get(&company).unwrap().custom_fields.is_empty());

    assert!(state.add_custom_field("missing", "X", FieldType::Text).is_none());
}

// ============================================================================
// Node types
// ============================================================================

#[test]
fn test_updating_definitions_reconciles_nodes() {
    let (mut state, employee) = org_state();

    assert!(state.update_node_type_definitions(
        &employee,
        vec![
            FieldDefinition::new("d-dept", "Team", FieldType::Text),
            FieldDefinition::new("d-mail", "Email", FieldType::Link),
        ],
    ));

    let kim = state.forest().get(&node_id(&state, "Kim")).unwrap();
    let fields: Vec<(&str, &str)> = kim
        .custom_fields
        .iter()
        .map(|f| (f.name.as_str(), f.value.as_str()))
        .collect();
    assert_eq!(fields, vec![("Team", "Sales"), ("Email", "")]);
    // Untyped nodes are untouched
    assert!(state
        .forest()
        .get(&node_id(&state, "Company"))
        .unwrap()
        .custom_fields
        .is_empty());
}

#[test]
fn test_deleting_type_leaves_dangling_reference() {
    let (mut state, employee) = org_state();
    state.set_query("type:employee");
    assert_eq!(state.results().len(), 3);

    assert!(state.delete_node_type(&employee));

    assert!(state.results().is_empty());
    let kim = state.forest().get(&node_id(&state, "Kim")).unwrap();
    assert_eq!(kim.node_type.as_deref(), Some(employee.as_str()));
    assert_eq!(state.to_document().dangling_type_refs().len(), 3);
}

#[test]
fn test_set_node_type_by_id() {
    let (mut state, employee) = org_state();
    let company = node_id(&state, "Company");

    assert!(!state.set_node_type(&company, Some("unknown")));
    assert!(state.set_node_type(&company, Some(employee.as_str())));
    assert_eq!(
        state.forest().get(&company).unwrap().custom_fields.len(),
        1
    );
    assert!(state.set_node_type(&company, None));
    assert_eq!(state.forest().get(&company).unwrap().node_type, None);
}

// ============================================================================
// Search state
// ============================================================================

#[test]
fn test_results_follow_mutations() {
    let (mut state, _) = org_state();
    state.set_query("department:sales");
    assert_eq!(state.results().len(), 2);

    let lee = node_id(&state, "Lee");
    state.delete_node(&lee);
    assert_eq!(state.results().len(), 1);

    let ana = node_id(&state, "Ana");
    let field = state.forest().get(&ana).unwrap().custom_fields[0].id.clone();
    state.update_custom_field_value(&ana, &field, "Sales");
    assert_eq!(state.results().len(), 2);
}

#[test]
fn test_focus_mode_and_highlight() {
    let (mut state, _) = org_state();
    assert!(!state.focus_mode());

    state.set_query("ana");

    assert!(state.focus_mode());
    let expected: std::collections::HashSet<String> = [
        node_id(&state, "Company"),
        node_id(&state, "Engineering"),
        node_id(&state, "Ana"),
    ]
    .into_iter()
    .collect();
    assert_eq!(state.highlighted_path(), expected);

    let rows: Vec<String> = state.visible_rows().into_iter().map(|r| r.name).collect();
    assert_eq!(rows, vec!["Company", "Engineering", "Ana"]);

    state.clear_search();
    assert!(!state.focus_mode());
}

#[test]
fn test_display_expansion_is_not_persisted() {
    let (mut state, _) = org_state();
    let engineering = node_id(&state, "Engineering");
    state.toggle_expand(&engineering);
    assert!(!state.forest().get(&engineering).unwrap().is_expanded());
    state.clear_dirty();

    state.set_query("ana");

    assert!(state.display_forest().get(&engineering).unwrap().is_expanded());
    assert!(!state.forest().get(&engineering).unwrap().is_expanded());
    assert!(!state.is_dirty());
}

#[test]
fn test_result_navigation_wraps() {
    let (mut state, _) = org_state();
    state.set_query("type:employee");

    assert_eq!(state.selected_index(), 0);
    assert_eq!(state.select_next(), (true, false));
    assert_eq!(state.select_next(), (true, false));
    assert_eq!(state.select_next(), (true, true));
    assert_eq!(state.selected_index(), 0);
    assert_eq!(state.select_previous(), (true, true));
    assert_eq!(state.selected_result().unwrap().name, "Ana");

    state.set_query("");
    assert_eq!(state.select_next(), (false, false));
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_import_replaces_content() {
    let (mut state, _) = org_state();

    let json = r#"{"tree": [{"id": "x", "name": "Imported", "children": []}], "treeTitle": "New"}"#;
    state.import_json(json).unwrap();

    assert_eq!(state.title(), "New");
    assert_eq!(state.forest().node_count(), 1);
    assert!(state.node_types().is_empty());
    assert!(state.is_dirty());
}

#[test]
fn test_failed_import_changes_nothing() {
    let (mut state, _) = org_state();
    let before = state.to_document();

    let err = state
        .import_json(r#"{"tree": [{"id": "x", "children": []}]}"#)
        .unwrap_err();

    assert_eq!(err.location(), Some("tree[0]"));
    assert_eq!(state.to_document(), before);
    assert!(!state.is_dirty());
}

#[test]
fn test_patch_carries_whole_document() {
    let (mut state, _) = org_state();
    state.set_title("Org chart");

    let patch = state.to_patch();

    assert_eq!(patch.tree.as_ref(), Some(state.forest()));
    assert_eq!(patch.tree_title.as_deref(), Some("Org chart"));
    assert_eq!(patch.node_types.map(|t| t.len()), Some(1));
}
