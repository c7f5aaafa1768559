//! Configuration module

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bounded retries for contended vote transactions
    #[serde(default = "default_vote_retries")]
    pub vote_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vote_retries: default_vote_retries(),
        }
    }
}

fn default_vote_retries() -> u32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default row count for the trust leaderboard
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: i64,

    /// Default page size for by-level listings
    #[serde(default = "default_level_page_size")]
    pub level_page_size: i64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            leaderboard_limit: default_leaderboard_limit(),
            level_page_size: default_level_page_size(),
        }
    }
}

fn default_leaderboard_limit() -> i64 {
    50
}

fn default_level_page_size() -> i64 {
    50
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        // Try local config first, then global
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        // Return default config
        Ok(Self::default())
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find local .rep/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(".rep").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find local .rep/data.db walking up directories
    pub fn find_local_db() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let db_path = current.join(".rep").join("data.db");
            if db_path.exists() {
                return Some(db_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Get global config path (~/.rep/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".rep").join("config.toml"))
    }

    /// Get global database path (~/.rep/data.db)
    pub fn global_db_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".rep").join("data.db"))
    }

    /// Get database path with priority:
    /// 1. REP_DATABASE env var
    /// 2. Local .rep/data.db (walking up from CWD)
    /// 3. Global ~/.rep/data.db
    pub fn database_path(&self) -> PathBuf {
        // 1. Environment variable
        if let Ok(env_path) = std::env::var("REP_DATABASE") {
            return PathBuf::from(env_path);
        }

        // 2. Local .rep/data.db (search up from current directory)
        if let Some(local_db) = Self::find_local_db() {
            return local_db;
        }

        // 3. Local .rep/ directory exists (even without data.db yet)
        if let Some(local_config) = Self::find_local_config() {
            return local_config.parent().unwrap().join("data.db");
        }

        // 4. Global ~/.rep/data.db
        if let Some(global) = Self::global_db_path() {
            return global;
        }

        // 5. Fallback to current directory
        PathBuf::from(".rep").join("data.db")
    }
}

/// Helper to get directories crate functionality
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE").ok().map(PathBuf::from)
        }
        #[cfg(not(windows))]
        {
            std::env::var("HOME").ok().map(PathBuf::from)
        }
    }
}
