//! Application configuration management.
//!
//! This module handles the persistent configuration for ztrim: the API base
//! used to resolve stream URLs, the default artist for uploads, the upload
//! limits the backend enforces and where the player writes its log.
//! Configuration is stored in the user's config directory (typically
//! ~/.config/ztrim/config.toml).

use crate::constants::AUDIO_EXTENSIONS;
use crate::upload::UploadLimits;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_artist")]
    pub default_artist: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:9999/api".to_string()
}

fn default_artist() -> String {
    // Try to get username and capitalize first letter
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME")) // Windows fallback
        .ok()
        .and_then(|name| {
            let mut chars = name.chars();
            chars.next().map(|first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .unwrap_or_default()
}

fn default_max_upload_mb() -> u64 {
    50
}

fn default_allowed_extensions() -> Vec<String> {
    AUDIO_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            default_artist: default_artist(),
            max_upload_mb: default_max_upload_mb(),
            allowed_extensions: default_allowed_extensions(),
            log_file: None,
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("ztrim")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("ztrim")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// Where the player log goes when none is configured
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("ztrim.log"))
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            allowed_extensions: self.allowed_extensions.clone(),
            max_bytes: self.max_upload_mb.saturating_mul(1_048_576),
        }
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "api_base_url" => {
                url::Url::parse(value).map_err(|e| format!("Invalid URL '{value}': {e}"))?;
                self.api_base_url = value.to_string();
            }
            "default_artist" => self.default_artist = value.to_string(),
            "max_upload_mb" => {
                self.max_upload_mb = value
                    .parse::<u64>()
                    .map_err(|_| "Value must be a whole number of megabytes")?;
            }
            "allowed_extensions" => {
                let exts: Vec<String> = value
                    .split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect();
                if exts.is_empty() {
                    return Err("At least one extension is required".into());
                }
                self.allowed_extensions = exts;
            }
            "log_file" => {
                self.log_file = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}
