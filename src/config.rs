//! Configuration management for iptvtui
//!
//! Handles config file loading/saving and backend URL resolution.
//! Config is stored at ~/.config/iptvtui/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default backend when nothing is configured
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8001";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog backend base URL
    pub backend_url: Option<String>,
    /// Preferred external player ("mpv" or "vlc")
    pub player: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/iptvtui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("iptvtui").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Resolve the backend base URL with fallback chain:
    /// 1. Environment variable IPTV_BACKEND_URL
    /// 2. Config file value
    /// 3. Built-in default
    pub fn backend_url(&self) -> String {
        if let Ok(url) = std::env::var("IPTV_BACKEND_URL") {
            if !url.trim().is_empty() {
                return url;
            }
        }

        self.backend_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }
}
