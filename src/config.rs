use crate::db::STORE_NAME;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Host configuration: where the todo store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub store_name: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            store_name: STORE_NAME.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let data_dir = match env_map.get("TODO_DATA_DIR").map(|s| s.trim()) {
            Some("") => {
                return Err(ConfigError::InvalidValue(
                    "TODO_DATA_DIR".to_string(),
                    "must not be empty".to_string(),
                ))
            }
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from("."),
        };

        let store_name = env_map
            .get("TODO_STORE_NAME")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| STORE_NAME.to_string());

        if store_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "TODO_STORE_NAME".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if store_name.contains(|c: char| c == '/' || c == '\\') {
            return Err(ConfigError::InvalidValue(
                "TODO_STORE_NAME".to_string(),
                format!("must not contain path separators, got {}", store_name),
            ));
        }

        Ok(Config {
            data_dir,
            store_name,
        })
    }

    /// Path of the SQLite file backing the named store.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.sqlite3", self.store_name))
    }
}
