use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_progress_reset_ms() -> u64 {
    1000
}

fn default_accepted_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

fn default_log_level() -> String {
    "warn,pdf_summary=info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// How long the finished progress bar stays at 100% before clearing.
    #[serde(default = "default_progress_reset_ms")]
    pub progress_reset_ms: u64,
    /// Extensions the path picker accepts. Drops are not filtered.
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: default_base_url(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 1200,
            height: 760,
            min_width: 800,
            min_height: 520,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            progress_reset_ms: default_progress_reset_ms(),
            accepted_extensions: default_accepted_extensions(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            backend: BackendConfig::default(),
            window: WindowConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Config {
    /// Reads the config file. A missing file means defaults; a broken one is
    /// an error the caller reports before falling back. Nothing is ever
    /// written back.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path();
        if !config_path.exists() {
            return Ok(Config::default());
        }
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Error reading {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Error parsing {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn get_config_path() -> PathBuf {
        if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config/pdf-summary/config.toml")
        } else {
            PathBuf::from("config.toml")
        }
    }
}
