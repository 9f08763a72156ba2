use crate::view::{CategoryFilter, SortBy};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub product_urls: Vec<String>,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub category_filter: CategoryFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            database_path: default_database_path(),
            retention_days: default_retention_days(),
            user_agent: default_user_agent(),
            request_timeout_seconds: default_request_timeout(),
            product_urls: Vec::new(),
            sort_by: SortBy::default(),
            category_filter: CategoryFilter::default(),
        }
    }
}

fn default_catalog_path() -> String {
    "alternatives.json".to_string()
}

fn default_database_path() -> String {
    "ecoswap.db".to_string()
}

fn default_retention_days() -> u32 {
    7
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) EcoSwap/0.1".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

pub fn parse_config(content: &str) -> Result<AppConfig, serde_json::Error> {
    serde_json::from_str(content)
}
