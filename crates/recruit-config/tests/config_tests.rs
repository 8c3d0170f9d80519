use std::path::PathBuf;

use recruit_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_matches_listing_conventions() {
    let cfg = Config::default();

    assert_eq!(cfg.export_prefix, "chiikiokoshi");
    assert_eq!(cfg.storage_key_prefix, "ai-widget-");
    assert_eq!(
        cfg.assistants.get("regionFeatures").map(String::as_str),
        Some("region-features.json")
    );
    assert!(cfg.ui_color_enabled);
    assert!(cfg.resolve_export_dir().ends_with("RecruitWizard"));
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.export_prefix = "takayama".to_string();
    cfg.export_dir = Some(dir.path().join("out"));
    cfg.accessibility.plain_output = true;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn missing_file_yields_defaults_and_partial_file_fills_gaps() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    let manager = ConfigManager::new(path.clone());
    assert_eq!(manager.load().expect("defaults"), Config::default());

    std::fs::write(&path, r#"{"export_prefix": "hida"}"#).expect("write");
    let loaded = manager.load().expect("partial config");
    assert_eq!(loaded.export_prefix, "hida");
    assert_eq!(loaded.storage_key_prefix, "ai-widget-");
    assert_eq!(
        loaded.resolve_questions_dir(&PathBuf::from("/app")),
        PathBuf::from("/app/questions")
    );
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ nope").expect("write");

    let err = ConfigManager::new(path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}
