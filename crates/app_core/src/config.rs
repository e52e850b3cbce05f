//! Application configuration

use crate::{AppError, CommandId};
use app_fs::HttpOptions;
use browse_proto::{BROWSE_ENDPOINT, MEDIA_ENDPOINT, MEDIA_FILENAME_PARAM};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `backend.base_url`
pub const BASE_URL_ENV: &str = "BROWSERA_BASE_URL";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub media: MediaConfig,
    pub general: GeneralConfig,
    /// Command id -> words accepted for it in the shell
    pub aliases: HashMap<String, Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            media: MediaConfig::default(),
            general: GeneralConfig::default(),
            aliases: default_aliases(),
        }
    }
}

/// Where the browse backend lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// `http://host:port`, no trailing separator
    pub base_url: String,
    pub browse_endpoint: String,
    /// Upper bound for one listing fetch; a superseded fetch is cancelled earlier
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            browse_endpoint: BROWSE_ENDPOINT.to_string(),
            request_timeout_ms: 15_000,
            connect_timeout_ms: 5_000,
        }
    }
}

/// Endpoint templates for streamed and paged media
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub video: String,
    pub audio: String,
    pub pdf: String,
    pub filename_param: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            video: format!("{}/video", MEDIA_ENDPOINT),
            audio: format!("{}/audio", MEDIA_ENDPOINT),
            pdf: format!("{}/pdf", MEDIA_ENDPOINT),
            filename_param: MEDIA_FILENAME_PARAM.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_retention_days: u32,
    /// Hand resolved media URLs to the system viewer on `play`
    pub open_with_system_viewer: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_retention_days: 7,
            open_with_system_viewer: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from file, then apply environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, defaults if it does not exist
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config = Self::from_toml_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Write the built-in defaults to `config_path` unless a file is there
    ///
    /// Environment overrides never reach the file. Returns true if written.
    pub fn write_defaults_if_missing(config_path: &Path) -> anyhow::Result<bool> {
        if config_path.exists() {
            return Ok(false);
        }
        Self::default().save_to(config_path)?;
        Ok(true)
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "Browsera", "Browsera")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Apply `BROWSERA_BASE_URL` if set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                tracing::info!("Backend address overridden by {}", BASE_URL_ENV);
                self.backend.base_url = base_url.trim().to_string();
            }
        }
    }

    /// Check and normalize values that the rest of the app relies on
    pub fn validate(&mut self) -> Result<(), AppError> {
        let raw = self.backend.base_url.trim();
        let lower = raw.to_lowercase();
        let host = lower
            .strip_prefix("http://")
            .or_else(|| lower.strip_prefix("https://"))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "backend.base_url must start with http:// or https://, got {:?}",
                    raw
                ))
            })?;
        if host.trim_end_matches('/').is_empty() {
            return Err(AppError::Config("backend.base_url has no host".into()));
        }
        self.backend.base_url = raw.trim_end_matches('/').to_string();

        if self.backend.request_timeout_ms == 0 {
            return Err(AppError::Config("backend.request_timeout_ms must be positive".into()));
        }

        for (name, template) in [
            ("video", &self.media.video),
            ("audio", &self.media.audio),
            ("pdf", &self.media.pdf),
        ] {
            if !template.starts_with('/') {
                return Err(AppError::Config(format!(
                    "media.{} must start with '/', got {:?}",
                    name, template
                )));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.request_timeout_ms)
    }

    /// Transport settings for the listing client
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            browse_endpoint: self.backend.browse_endpoint.clone(),
            request_timeout: self.request_timeout(),
            connect_timeout: Duration::from_millis(self.backend.connect_timeout_ms),
        }
    }

    /// Resolve a typed word to a command id through the alias table
    pub fn command_for_alias(&self, word: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(_, words)| words.iter().any(|w| w.eq_ignore_ascii_case(word)))
            .map(|(id, _)| id.as_str())
    }
}

fn default_aliases() -> HashMap<String, Vec<String>> {
    let mut aliases = HashMap::new();

    // ========================================
    // Navigation (nav.*)
    // ========================================

    aliases.insert(CommandId::NAV_HOME.into(), vec!["home".into(), "~".into()]);
    aliases.insert(CommandId::NAV_BREADCRUMB.into(), vec!["crumb".into(), "jump".into()]);
    aliases.insert(CommandId::NAV_UP_FOLDER.into(), vec!["up".into(), "..".into()]);
    aliases.insert(CommandId::NAV_ENTER_FOLDER.into(), vec!["cd".into(), "enter".into()]);
    aliases.insert(CommandId::NAV_BACK.into(), vec!["back".into(), "b".into()]);
    aliases.insert(CommandId::NAV_FORWARD.into(), vec!["fwd".into(), "forward".into()]);
    aliases.insert(CommandId::NAV_RELOAD.into(), vec!["reload".into(), "r".into()]);

    // ========================================
    // File (file.*)
    // ========================================

    aliases.insert(CommandId::FILE_OPEN.into(), vec!["open".into(), "o".into()]);
    aliases.insert(CommandId::FILE_CLOSE.into(), vec!["close".into(), "c".into()]);

    // ========================================
    // App (app.*)
    // ========================================

    aliases.insert(CommandId::APP_QUIT.into(), vec!["quit".into(), "q".into(), "exit".into()]);

    aliases
}
