//! Tests for layered configuration loading.

use super::*;
use crate::{ChatConfig, GatewayConfig, StorageConfig};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.user_config_path = None;
    options
}

#[test]
fn parse_minimal_config() {
    let config = RackstockConfig::load_from_str("{}").expect("config");
    assert_eq!(config, RackstockConfig::default());
    assert_eq!(config.storage.path, ".rackstock");
    assert_eq!(config.gateway.model, "gemini-2.5-flash");
    assert_eq!(config.gateway.fallback_delay_ms, 1500);
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = RackstockConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_wrong_type_with_dotted_path() {
    let err = RackstockConfig::load_from_str(r#"{ gateway: { timeout_secs: "soon" } }"#)
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("gateway.timeout_secs"), "{msg}");
}

#[test]
fn rejects_zero_timeout() {
    let err = RackstockConfig::load_from_str(r#"{ gateway: { timeout_secs: 0 } }"#).unwrap_err();
    assert!(format!("{err}").contains("greater than zero"));
}

#[test]
fn cwd_layer_overrides_project_and_user() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("user.json5");
    write_json5(
        &user_config,
        "{ gateway: { model: \"user-model\", api_key_env: \"USER_KEY\" } }",
    );
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        "{ gateway: { model: \"project-model\" }, storage: { path: \"/var/rackstock\" } }",
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ gateway: { model: \"cwd-model\" } }",
    );

    let mut options = LayeredConfigOptions::new(&cwd);
    options.user_config_path = Some(user_config);

    let layered = RackstockConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.gateway.model, "cwd-model");
    assert_eq!(layered.config.gateway.api_key_env, "USER_KEY");
    assert_eq!(layered.config.storage.path, "/var/rackstock");
    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd
        ]
    );
}

#[test]
fn runtime_override_wins() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    fs::create_dir_all(&cwd).expect("cwd");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ chat: { greeting: \"cwd\" } }",
    );
    let runtime = temp.path().join("override.json5");
    write_json5(&runtime, "{ chat: { greeting: \"runtime\" } }");

    let options = isolated_options(&cwd).with_runtime_path(&runtime);
    let layered = RackstockConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.chat.greeting.as_deref(), Some("runtime"));
}

#[test]
fn missing_runtime_path_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = RackstockConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::MissingOverride(_)));
}

#[test]
fn project_and_cwd_layer_are_loaded_once_when_identical() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    fs::create_dir_all(root.join(".git")).expect("git");
    write_json5(
        &root.join(DEFAULT_CONFIG_FILE),
        "{ storage: { path: \"data\" } }",
    );

    let layered =
        RackstockConfig::load_layered_with_options(isolated_options(root)).expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.config.storage.path, "data");
}

#[test]
fn invalid_layer_reports_layer_label() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        "{ storage: { bucket: \"x\" } }",
    );
    let err = RackstockConfig::load_layered_with_options(isolated_options(temp.path()))
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("), "{msg}");
    assert!(msg.contains("storage.bucket"), "{msg}");
}

#[test]
fn builder_replaces_sections() {
    let config = RackstockConfig::builder()
        .storage(StorageConfig {
            path: "/tmp/stock".to_string(),
        })
        .chat(ChatConfig {
            greeting: Some("hi".to_string()),
        })
        .build();
    assert_eq!(config.storage.path, "/tmp/stock");
    assert_eq!(config.chat.greeting.as_deref(), Some("hi"));
    assert_eq!(config.gateway, GatewayConfig::default());
}
