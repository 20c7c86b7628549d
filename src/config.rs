use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::scope_path;

const DEFAULT_DATABASE_PATH: &str = "./favorites.db";
const DEFAULT_SEARCH_COMMAND: &str = "fdfind";
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub root_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    #[serde(default)]
    pub open_in_new_window: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_command")]
    pub command: String,
    /// Seconds before a running search is killed. Zero means no deadline.
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            command: default_search_command(),
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_search_command() -> String {
    DEFAULT_SEARCH_COMMAND.to_string()
}

fn default_search_timeout_secs() -> u64 {
    DEFAULT_SEARCH_TIMEOUT_SECS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, AppError> {
        let mut config: Config = serde_yaml::from_str(raw)?;

        let root = config.server.root_path.to_string_lossy().to_string();
        if !config.server.root_path.is_absolute() {
            return Err(AppError::General(format!(
                "server.root_path must be absolute: {root}"
            )));
        }
        config.server.root_path = PathBuf::from(scope_path::normalize(&root));

        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.server.root_path
    }
}
