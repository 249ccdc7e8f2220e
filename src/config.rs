//! Configuration management for quizgen
//!
//! Settings come from an optional TOML file (`~/.quizgen/config.toml` by
//! default) with environment variables layered on top. The completion-API
//! credential is only ever read from the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the completion-API credential
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const PORT_VAR: &str = "QUIZGEN_PORT";
pub const MODEL_VAR: &str = "QUIZGEN_MODEL";
pub const BASE_URL_VAR: &str = "QUIZGEN_BASE_URL";

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body cap in megabytes
    pub max_upload_mb: usize,
    /// CORS allow-list; "*" allows any origin
    pub allowed_origins: Vec<String>,
    /// Where uploads are staged during a request (system temp dir if unset)
    pub upload_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_mb: 50,
            allowed_origins: vec!["https://lria02.github.io".to_string()],
            upload_dir: None,
        }
    }
}

/// Completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Credential, filled from the environment only
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub filter: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub completion: CompletionSettings,
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the default config file path (~/.quizgen/config.toml)
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(".quizgen").join("config.toml"))
    }

    /// Load config from `path` (or the default location); missing file means defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse TOML config text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Load config and apply environment overrides
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Layer variables from `lookup` over the file values
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_VAR) {
            self.completion.api_key = Some(key);
        }
        if let Some(port) = lookup(PORT_VAR) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} must be a port number, got {:?}", PORT_VAR, port))?;
        }
        if let Some(model) = lookup(MODEL_VAR) {
            self.completion.model = model;
        }
        if let Some(base_url) = lookup(BASE_URL_VAR) {
            self.completion.base_url = base_url;
        }
        Ok(())
    }

    /// Save config to disk (the credential is never written)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}
