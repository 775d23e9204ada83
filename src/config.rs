// src/config.rs

//! Configuration loading.
//!
//! Everything has a default; a TOML file only needs the keys it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::get_database_path;
use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "https://comicvine.gamespot.com/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Items requested per page by list mediators.
    pub page_size: u32,
    /// Upper bound of the "recent" lists; paging stops once reached.
    pub recent_items_cap: u32,
    /// Overrides the platform data directory location.
    pub database_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: format!("comicvine-rs/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            page_size: 20,
            recent_items_cap: 100,
            database_path: None,
        }
    }
}

impl AppConfig {
    /// `{CONFIG_DIR}/comicvine/config.toml`
    pub fn default_path() -> AppResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Config("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("comicvine").join("config.toml"))
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults if loading fails.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load config from {}: {}", path.display(), e);
            log::warn!("Using default configuration.");
            Self::default()
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be greater than zero".to_string()));
        }
        if self.recent_items_cap < self.page_size {
            return Err(AppError::Config(format!(
                "recent_items_cap ({}) must be at least page_size ({})",
                self.recent_items_cap, self.page_size
            )));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "api_base_url must be an http(s) URL, got {}",
                self.api_base_url
            )));
        }
        Ok(())
    }

    pub fn resolved_database_path(&self) -> AppResult<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => get_database_path(),
        }
    }
}
