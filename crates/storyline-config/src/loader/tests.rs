//! Tests for layered configuration loading.

use super::*;
use crate::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
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

/// Options isolated from the machine's real system and user layers.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.system_config_path = None;
    options.user_config_path = None;
    options
}

#[test]
fn parse_minimal_config() {
    let config = StorylineConfig::load_from_str("{}").expect("config");
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.storage.path, None);
    assert!(!config.sync.offline);
}

#[test]
fn parses_json5_comments_and_trailing_commas() {
    let json5 = r#"{
        // staging backend
        api: { base_url: "https://staging.example.com/api/v1", timeout_secs: 5, },
        sync: { offline: true },
    }"#;
    let config = StorylineConfig::load_from_str(json5).expect("config");
    assert_eq!(config.api.base_url, "https://staging.example.com/api/v1");
    assert_eq!(config.api.timeout(), std::time::Duration::from_secs(5));
    assert!(config.sync.offline);
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = StorylineConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"), "{msg}");
}

#[test]
fn rejects_wrongly_typed_field_with_path() {
    let err = StorylineConfig::load_from_str(r#"{ api: { timeout_secs: "ten" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("api.timeout_secs"), "{msg}");
}

#[test]
fn validate_rejects_bad_api_settings() {
    for json5 in [
        r#"{ api: { base_url: "" } }"#,
        r#"{ api: { base_url: "ftp://example.com" } }"#,
        r#"{ api: { base_url: "localhost:8000" } }"#,
        r#"{ api: { timeout_secs: 0 } }"#,
    ] {
        let err = StorylineConfig::load_from_str(json5).expect_err(json5);
        assert!(matches!(err, ConfigError::InvalidField { .. }), "{json5}: {err}");
    }
}

#[test]
fn builder_output_validates() {
    let config = StorylineConfig::builder()
        .base_url("https://api.example.com/v1")
        .timeout_secs(10)
        .storage_path("/tmp/storyline")
        .offline(true)
        .build();
    config.validate().expect("valid");
    assert_eq!(
        config.storage.resolved_path(),
        Some(std::path::PathBuf::from("/tmp/storyline"))
    );
}

#[test]
fn layered_config_prefers_cwd_over_project_and_user() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let system_config = root.join("system.json5");
    write_json5(
        &system_config,
        r#"{ api: { base_url: "http://system", timeout_secs: 11 } }"#,
    );
    let user_config = root.join("user.json5");
    write_json5(&user_config, r#"{ api: { base_url: "http://user" } }"#);
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ api: { base_url: "http://project" }, sync: { offline: true } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ api: { base_url: "http://cwd" } }"#,
    );

    let mut options = LayeredConfigOptions::new(&cwd);
    options.system_config_path = Some(system_config);
    options.user_config_path = Some(user_config);

    let layered = StorylineConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.api.base_url, "http://cwd");
    assert_eq!(layered.config.api.timeout_secs, 11);
    assert!(layered.config.sync.offline);
    let sources: Vec<ConfigLayerSource> = layered.layers.iter().map(|l| l.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::System,
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
        ]
    );
}

#[test]
fn project_and_cwd_layer_load_once_when_identical() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ api: { timeout_secs: 3 } }"#,
    );

    let layered =
        StorylineConfig::load_layered_with_options(isolated_options(&project_root))
            .expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::Project);
}

#[test]
fn runtime_override_wins_over_files() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    write_json5(
        &root.join(DEFAULT_CONFIG_FILE),
        r#"{ api: { base_url: "http://cwd" } }"#,
    );
    let runtime_config = root.join("runtime.json5");
    write_json5(&runtime_config, r#"{ api: { base_url: "http://runtime" } }"#);

    let options = isolated_options(root).with_runtime_path(&runtime_config);
    let layered = StorylineConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.api.base_url, "http://runtime");
}

#[test]
fn missing_runtime_path_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = StorylineConfig::load_layered_with_options(options).expect_err("missing");
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn layer_errors_name_the_offending_file() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        r#"{ sync: { offline: "yes" } }"#,
    );
    let err = StorylineConfig::load_layered_with_options(isolated_options(temp.path()))
        .expect_err("bad type");
    let msg = format!("{err}");
    assert!(msg.contains("cwd("), "{msg}");
    assert!(msg.contains("sync.offline"), "{msg}");
}

#[test]
fn environment_overrides_every_file_layer() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let runtime_config = root.join("runtime.json5");
    write_json5(
        &runtime_config,
        r#"{ api: { base_url: "http://runtime", timeout_secs: 9 } }"#,
    );

    let options = isolated_options(root)
        .with_runtime_path(&runtime_config)
        .with_env([
            (ENV_API_BASE_URL, "https://env.example.com/api/v1"),
            (ENV_OFFLINE, "true"),
            (ENV_STORAGE_PATH, "/var/lib/storyline"),
            ("STORYLINE_UNRELATED", "ignored"),
        ]);
    let layered = StorylineConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.api.base_url, "https://env.example.com/api/v1");
    assert_eq!(layered.config.api.timeout_secs, 9);
    assert!(layered.config.sync.offline);
    assert_eq!(
        layered.config.storage.path,
        Some(std::path::PathBuf::from("/var/lib/storyline"))
    );
    assert_eq!(
        layered.layers.last().map(|l| l.source),
        Some(ConfigLayerSource::Env)
    );
}

#[test]
fn malformed_environment_values_are_rejected() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_env([(ENV_TIMEOUT_SECS, "soon")]);
    let err = StorylineConfig::load_layered_with_options(options).expect_err("timeout");
    assert!(format!("{err}").contains(ENV_TIMEOUT_SECS));

    let options = isolated_options(temp.path()).with_env([(ENV_OFFLINE, "maybe")]);
    let err = StorylineConfig::load_layered_with_options(options).expect_err("flag");
    assert!(format!("{err}").contains(ENV_OFFLINE));
}

#[test]
fn environment_cannot_bypass_validation() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_env([(ENV_TIMEOUT_SECS, "0")]);
    let err = StorylineConfig::load_layered_with_options(options).expect_err("zero");
    assert!(format!("{err}").contains("api.timeout_secs"));
}

#[test]
fn absent_optional_layers_are_skipped() {
    let temp = TempDir::new().expect("tmp");
    let missing = temp.path().join(DEFAULT_CONFIG_FILE);
    let skipped = super::layer_io::load_optional_layer(ConfigLayerSource::User, Some(&missing))
        .expect("absent file");
    assert!(skipped.is_none());
    let unset = super::layer_io::load_optional_layer(ConfigLayerSource::System, None)
        .expect("no path");
    assert!(unset.is_none());

    write_json5(&missing, "{ api: { timeout_secs: 5 } }");
    let loaded = super::layer_io::load_optional_layer(ConfigLayerSource::User, Some(&missing))
        .expect("present file")
        .expect("loaded layer");
    assert_eq!(loaded.meta.source, ConfigLayerSource::User);
    assert_eq!(loaded.meta.path.as_deref(), Some(missing.as_path()));
    assert_eq!(
        super::layer_io::layer_label(ConfigLayerSource::User, &missing),
        format!("user({})", missing.display())
    );
}
