use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use treequill::config::Config;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.storage_dir, None);
    assert!(!config.compress);
    assert_eq!(config.save_debounce_ms, 500);
    assert!(!config.create_backup);
    assert_eq!(config.indent_size, 2);
    assert!(config.auto_expand_results);
}

#[test]
fn test_save_debounce_duration() {
    let config = Config {
        save_debounce_ms: 1500,
        ..Config::default()
    };
    assert_eq!(config.save_debounce(), Duration::from_millis(1500));
}

#[test]
fn test_config_serialization() {
    let config = Config {
        compress: true,
        indent_size: 4,
        ..Config::default()
    };

    let toml_str = toml::to_string(&config).unwrap();
    let deserialized: Config = toml::from_str(&toml_str).unwrap();

    assert_eq!(config, deserialized);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: Config = toml::from_str("compress = true\n").unwrap();

    assert!(config.compress);
    assert_eq!(config.save_debounce_ms, 500);
    assert_eq!(config.indent_size, 2);
    assert!(config.auto_expand_results);
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "storage_dir = \"/srv/trees\"\nsave_debounce_ms = 250\nauto_expand_results = false\n",
    )
    .unwrap();

    let config = Config::load_from(&path);

    assert_eq!(config.resolved_storage_dir(), Some("/srv/trees".into()));
    assert_eq!(config.save_debounce_ms, 250);
    assert!(!config.auto_expand_results);
}

#[test]
fn test_missing_or_invalid_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();

    assert_eq!(Config::load_from(dir.path().join("absent.toml")), Config::default());

    let path = dir.path().join("broken.toml");
    fs::write(&path, "indent_size = \"wide\"").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
}
