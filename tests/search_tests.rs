use pretty_assertions::assert_eq;
use treequill::document::node::{CustomField, FieldType, Icon, Node, NodeType};
use treequill::document::tree::Forest;
use treequill::query::{search, Evaluator, MatchField, Parser};

fn org() -> (Forest, Vec<NodeType>) {
    let types = vec![
        NodeType::new("t-emp", "Employee"),
        NodeType::new("t-dept", "Department Unit"),
    ];
    let forest = Forest::new(vec![Node::new("co", "Company")
        .with_icon(Icon::from("🏢"))
        .with_child(
            Node::new("sales", "Sales")
                .with_node_type("t-dept")
                .with_child(
                    Node::new("kim", "Kim")
                        .with_node_type("t-emp")
                        .with_custom_field(CustomField::new(
                            "f1",
                            "Department",
                            FieldType::Text,
                            "Sales",
                        ))
                        .with_custom_field(CustomField::new("f2", "Email", FieldType::Link, "kim@example.com")),
                )
                .with_child(
                    Node::new("lee", "Lee")
                        .with_node_type("t-emp")
                        .with_custom_field(CustomField::new(
                            "f3",
                            "Department",
                            FieldType::Text,
                            "Engineering",
                        )),
                ),
        )
        .with_child(
            Node::new("ghost", "Contractor")
                .with_node_type("t-deleted")
                .with_custom_field(CustomField::new("f4", "Department", FieldType::Text, "Sales")),
        )]);
    (forest, types)
}

fn result_ids(results: &[treequill::query::SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.node_id.as_str()).collect()
}

// ============================================================================
// Qualifiers
// ============================================================================

#[test]
fn test_type_and_field_qualifiers_are_conjunctive() {
    let (forest, types) = org();

    let results = search(&forest, &types, "type:Employee Department:Sales");

    assert_eq!(result_ids(&results), vec!["kim"]);
    assert_eq!(results[0].match_field, MatchField::Field("Department".to_string()));
    assert_eq!(results[0].match_value, "Sales");
    assert_eq!(results[0].path, vec!["co", "sales", "kim"]);
}

#[test]
fn test_field_qualifier_without_type() {
    let (forest, types) = org();

    let results = search(&forest, &types, "department:sales");

    assert_eq!(result_ids(&results), vec!["kim", "ghost"]);
}

#[test]
fn test_unicode_qualifier() {
    let forest = Forest::new(vec![Node::new("n", "N").with_custom_field(CustomField::new(
        "f",
        "部署",
        FieldType::Text,
        "営業部",
    ))]);

    let results = search(&forest, &[], "部署:営業部");

    assert_eq!(result_ids(&results), vec!["n"]);
    assert_eq!(results[0].match_field.as_str(), "部署");
    assert_eq!(results[0].match_value, "営業部");
}

#[test]
fn test_type_filter_is_substring_and_reports_type() {
    let (forest, types) = org();

    let results = search(&forest, &types, "type:UNIT");

    assert_eq!(result_ids(&results), vec!["sales"]);
    assert_eq!(results[0].match_field, MatchField::Type);
    assert_eq!(results[0].match_value, "Department Unit");
}

#[test]
fn test_dangling_type_never_matches_type_filter() {
    let (forest, types) = org();

    let results = search(&forest, &types, "type:e");

    assert!(!result_ids(&results).contains(&"ghost"));
}

// ============================================================================
// Free text
// ============================================================================

#[test]
fn test_free_text_priority_name_before_fields() {
    let (forest, types) = org();

    let results = search(&forest, &types, "sales");

    // Sales matches by name; kim and ghost by a field value
    assert_eq!(result_ids(&results), vec!["sales", "kim", "ghost"]);
    assert_eq!(results[0].match_field, MatchField::Name);
    assert_eq!(results[1].match_field, MatchField::Field("Department".to_string()));
}

#[test]
fn test_free_text_first_field_wins() {
    let (forest, types) = org();

    let results = search(&forest, &types, "e");
    let kim = results.iter().find(|r| r.node_id == "kim").unwrap();

    // Name "Kim" has no "e"; the first field (by name "Department") wins
    assert_eq!(kim.match_field, MatchField::Field("Department".to_string()));
    assert_eq!(kim.match_value, "Sales");
}

#[test]
fn test_free_text_skips_remote_icons() {
    let forest = Forest::new(vec![
        Node::new("a", "A").with_icon(Icon::from("🏢")),
        Node::new("b", "B").with_icon(Icon::from("https://example.com/🏢.png")),
    ]);

    let results = search(&forest, &[], "🏢");

    assert_eq!(result_ids(&results), vec!["a"]);
    assert_eq!(results[0].match_field, MatchField::Icon);
}

#[test]
fn test_free_text_matches_inline_image_icon() {
    let forest = Forest::new(vec![
        Node::new("n", "N").with_icon(Icon::from("data:image/png;base64,AAAA")),
    ]);

    let results = search(&forest, &[], "png");

    assert_eq!(result_ids(&results), vec!["n"]);
    assert_eq!(results[0].match_field, MatchField::Icon);
    assert_eq!(results[0].match_value, "data:image/png;base64,AAAA");
}

#[test]
fn test_free_text_keeps_inner_whitespace() {
    let forest = Forest::new(vec![
        Node::new("double", "Big  Deal"),
        Node::new("single", "Big Deal"),
        Node::new("tab", "Big\tDeal"),
    ]);

    assert_eq!(result_ids(&search(&forest, &[], "Big  Deal")), vec!["double"]);
    assert_eq!(result_ids(&search(&forest, &[], " big\tdeal ")), vec!["tab"]);
}

#[test]
fn test_free_text_combined_with_qualifier() {
    let (forest, types) = org();

    let results = search(&forest, &types, "department:sales contractor");

    assert_eq!(result_ids(&results), vec!["ghost"]);
    assert_eq!(results[0].match_field, MatchField::Name);
}

// ============================================================================
// Empty queries and determinism
// ============================================================================

#[test]
fn test_empty_query_matches_nothing() {
    let (forest, types) = org();

    assert!(search(&forest, &types, "").is_empty());
    assert!(search(&forest, &types, "   \t ").is_empty());
}

#[test]
fn test_results_are_preorder_and_deterministic() {
    let (forest, types) = org();
    let evaluator = Evaluator::new(&types);

    let first = evaluator.search(&forest, "a");
    let second = evaluator.search(&forest, "a");

    assert_eq!(first, second);
    assert_eq!(result_ids(&first), vec!["co", "sales", "kim", "lee", "ghost"]);
}

#[test]
fn test_evaluate_parsed_query() {
    let (forest, types) = org();
    let query = Parser::parse("type:employee type:unit");

    let results = Evaluator::new(&types).evaluate(&forest, &query);

    // Last type filter wins
    assert_eq!(result_ids(&results), vec!["sales"]);
}
