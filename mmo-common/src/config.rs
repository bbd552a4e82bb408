//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MMO_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and defaults apply.
//! OAuth credentials may also come from the environment, which overrides TOML.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "MMO_ROOT_FOLDER";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5730;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the key-value store
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Marks cookies `Secure`
    #[serde(default)]
    pub production: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub spotify: ProviderSettings,

    #[serde(default)]
    pub youtube: ProviderSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// OAuth client settings of one provider
///
/// Endpoint URLs are optional overrides of the provider's public endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Public API key (YouTube Data API fallback)
    pub api_key: Option<String>,
    pub auth_url: Option<String>,
    pub token_url: Option<String>,
    pub api_base: Option<String>,
    pub scopes: Option<Vec<String>>,
}

impl ProviderSettings {
    /// Client id and secret are both present and non-empty
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.is_empty());
        present(&self.client_id) && present(&self.client_secret)
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            bind: default_bind(),
            port: default_port(),
            production: false,
            logging: LoggingConfig::default(),
            spotify: ProviderSettings::default(),
            youtube: ProviderSettings::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `path` (or the platform config file), falling back to defaults
    ///
    /// A malformed file is still an error; only absence is tolerated.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => {
                    warn!("Could not determine config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let config = Self::load(&path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply credential and mode overrides from the environment
    pub fn apply_env_overrides(&mut self) {
        override_from_env(&mut self.spotify.client_id, "SPOTIFY_CLIENT_ID");
        override_from_env(&mut self.spotify.client_secret, "SPOTIFY_CLIENT_SECRET");
        override_from_env(&mut self.spotify.redirect_uri, "SPOTIFY_REDIRECT_URI");
        override_from_env(&mut self.youtube.client_id, "GOOGLE_CLIENT_ID");
        override_from_env(&mut self.youtube.client_secret, "GOOGLE_CLIENT_SECRET");
        override_from_env(&mut self.youtube.redirect_uri, "YOUTUBE_REDIRECT_URI");
        // Browser-build name, applied first so YOUTUBE_API_KEY wins
        override_from_env(&mut self.youtube.api_key, "NEXT_PUBLIC_YOUTUBE_API_KEY");
        override_from_env(&mut self.youtube.api_key, "YOUTUBE_API_KEY");

        if std::env::var("MMO_ENV").map_or(false, |v| v == "production") {
            self.production = true;
        }
    }
}

fn override_from_env(slot: &mut Option<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        if !value.is_empty() {
            *slot = Some(value);
        }
    }
}

/// Platform config file: `<config dir>/mmo/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mmo").join("config.toml"))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mmo"))
        .unwrap_or_else(|| PathBuf::from("./mmo_data"))
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_value = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        if let Some(path) = &self.toml_value {
            return path.clone();
        }
        default_root_folder()
    }
}

/// Create the root folder when missing
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        info!("Created root folder: {}", root.display());
    }
    Ok(())
}
