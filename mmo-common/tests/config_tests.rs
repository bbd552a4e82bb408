//! Configuration resolution tests
//!
//! Tests that manipulate environment variables are marked #[serial]
//! so they run sequentially, not in parallel.

use mmo_common::config::{
    default_root_folder, ensure_root_folder, RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = RootFolderResolver::new().resolve();
    assert_eq!(root, default_root_folder());
}

#[test]
#[serial]
fn test_resolver_cli_takes_precedence() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/mmo-env");

    let root = RootFolderResolver::new()
        .with_cli_arg(Some(PathBuf::from("/tmp/mmo-cli")))
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/mmo-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/mmo-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/mmo-toml")),
        ..Default::default()
    };

    let root = RootFolderResolver::new().with_toml(&config).resolve();
    assert_eq!(root, PathBuf::from("/tmp/mmo-env"));

    env::remove_var(ROOT_FOLDER_ENV);
    let root = RootFolderResolver::new().with_toml(&config).resolve();
    assert_eq!(root, PathBuf::from("/tmp/mmo-toml"));
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = TomlConfig::load_or_default(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.port, mmo_common::config::DEFAULT_PORT);
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();
    assert!(TomlConfig::load_or_default(Some(&path)).is_err());
}

#[test]
fn test_config_file_is_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "port = 9001\nproduction = true\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.port, 9001);
    assert!(config.production);
    assert_eq!(config.logging.level, "debug");
}

#[test]
#[serial]
fn test_env_overrides_credentials() {
    env::set_var("SPOTIFY_CLIENT_ID", "env-id");
    env::set_var("SPOTIFY_CLIENT_SECRET", "env-secret");
    env::set_var("YOUTUBE_API_KEY", "env-key");
    env::set_var("MMO_ENV", "production");

    let mut config = TomlConfig::default();
    config.spotify.client_id = Some("toml-id".into());
    config.apply_env_overrides();

    assert_eq!(config.spotify.client_id.as_deref(), Some("env-id"));
    assert!(config.spotify.has_credentials());
    assert_eq!(config.youtube.api_key.as_deref(), Some("env-key"));
    assert!(config.production);

    env::remove_var("SPOTIFY_CLIENT_ID");
    env::remove_var("SPOTIFY_CLIENT_SECRET");
    env::remove_var("YOUTUBE_API_KEY");
    env::remove_var("MMO_ENV");
}

#[test]
#[serial]
fn test_youtube_api_key_public_alias() {
    env::remove_var("YOUTUBE_API_KEY");
    env::set_var("NEXT_PUBLIC_YOUTUBE_API_KEY", "public-key");

    let mut config = TomlConfig::default();
    config.apply_env_overrides();
    assert_eq!(config.youtube.api_key.as_deref(), Some("public-key"));

    // The unprefixed name takes precedence when both are set
    env::set_var("YOUTUBE_API_KEY", "server-key");
    let mut config = TomlConfig::default();
    config.apply_env_overrides();
    assert_eq!(config.youtube.api_key.as_deref(), Some("server-key"));

    env::remove_var("NEXT_PUBLIC_YOUTUBE_API_KEY");
    env::remove_var("YOUTUBE_API_KEY");
}

#[test]
fn test_ensure_root_folder_creates_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("root");
    ensure_root_folder(&root).unwrap();
    assert!(root.is_dir());
    // Second call is a no-op
    ensure_root_folder(&root).unwrap();
}
