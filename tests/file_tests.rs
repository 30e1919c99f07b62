use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use treequill::config::Config;
use treequill::document::format::{TreeDocument, EXPORT_VERSION};
use treequill::document::node::{CustomField, FieldDefinition, FieldType, Node, NodeType};
use treequill::document::tree::Forest;
use treequill::file::loader::{
    detect_format, is_gzipped, load_document_file, load_document_from_bytes, DocumentFormat,
};
use treequill::file::saver::{export_document_file, save_document_file};

/// Helper function to create a temporary file path with the given name
fn temp_file_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn sample_document() -> TreeDocument {
    let employee = NodeType::new("t-emp", "Employee")
        .with_definition(FieldDefinition::new("d1", "Department", FieldType::Text));
    let forest = Forest::new(vec![Node::new("co", "Company").with_child(
        Node::new("kim", "Kim")
            .with_node_type("t-emp")
            .with_custom_field(
                CustomField::new("f1", "Department", FieldType::Text, "営業部").with_definition_id("d1"),
            ),
    )]);
    TreeDocument::new(forest, vec![employee], "Org")
}

// ============================================================================
// Format detection
// ============================================================================

#[test]
fn test_detect_format() {
    assert_eq!(detect_format("org.json"), DocumentFormat::Json);
    assert_eq!(detect_format("org.yaml"), DocumentFormat::Yaml);
    assert_eq!(detect_format("org.yml.gz"), DocumentFormat::Yaml);
    assert_eq!(detect_format("org.json.gz"), DocumentFormat::Json);
    assert!(is_gzipped("org.json.gz"));
    assert!(!is_gzipped("org.json"));
}

// ============================================================================
// Save / load
// ============================================================================

#[test]
fn test_json_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "org.json");
    let doc = sample_document();

    save_document_file(&path, &doc, &Config::default()).unwrap();
    let loaded = load_document_file(&path).unwrap();

    assert_eq!(loaded, doc);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"tree\""));
    assert!(text.ends_with('\n'));
}

#[test]
fn test_gzip_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "org.json.gz");
    let doc = sample_document();

    save_document_file(&path, &doc, &Config::default()).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    assert_eq!(load_document_file(&path).unwrap(), doc);
}

#[test]
fn test_yaml_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "org.yaml");
    let doc = sample_document();

    save_document_file(&path, &doc, &Config::default()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("treeTitle: Org"));
    assert_eq!(load_document_file(&path).unwrap(), doc);
}

#[test]
fn test_backup_created_when_configured() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "org.json");
    let config = Config {
        create_backup: true,
        ..Config::default()
    };

    save_document_file(&path, &TreeDocument::default(), &config).unwrap();
    let first = fs::read_to_string(&path).unwrap();
    save_document_file(&path, &sample_document(), &config).unwrap();

    let backup = temp_file_path(&dir, "org.json.bak");
    assert_eq!(fs::read_to_string(backup).unwrap(), first);
}

#[test]
fn test_no_backup_by_default() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "org.json");

    save_document_file(&path, &TreeDocument::default(), &Config::default()).unwrap();
    save_document_file(&path, &sample_document(), &Config::default()).unwrap();

    assert!(!temp_file_path(&dir, "org.json.bak").exists());
}

#[test]
fn test_no_temp_file_left_behind() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "org.json");

    save_document_file(&path, &sample_document(), &Config::default()).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["org.json".to_string()]);
}

// ============================================================================
// Export and import errors
// ============================================================================

#[test]
fn test_export_is_stamped() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "export.json");

    export_document_file(&path, &sample_document(), &Config::default()).unwrap();

    let loaded = load_document_file(&path).unwrap();
    assert_eq!(loaded.version.as_deref(), Some(EXPORT_VERSION));
    assert!(loaded.export_date.is_some());
    assert_eq!(loaded.tree, sample_document().tree);
}

#[test]
fn test_invalid_file_reports_location() {
    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "bad.json");
    fs::write(&path, r#"{"tree": [{"id": "a", "children": []}]}"#).unwrap();

    let err = load_document_file(&path).unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("tree[0]: missing required field `name`"), "{}", message);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_document_file(temp_file_path(&dir, "absent.json")).is_err());
}

#[test]
fn test_bytes_sniff_yaml_and_gzip() {
    let yaml = "tree:\n  - id: a\n    name: A\n    children: []\n";
    let doc = load_document_from_bytes(yaml.as_bytes()).unwrap();
    assert_eq!(doc.tree.node_count(), 1);

    let dir = TempDir::new().unwrap();
    let path = temp_file_path(&dir, "org.json.gz");
    save_document_file(&path, &sample_document(), &Config::default()).unwrap();
    let gz = load_document_from_bytes(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(gz, sample_document());
}
