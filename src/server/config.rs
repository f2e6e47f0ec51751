//! Server configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KaisangError, Result};

/// Configuration for the serving process.
///
/// Loaded from an optional JSON file; every field has a default so a bare
/// `kaisang serve` works out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Directory holding the trained artifact bundle.
    pub models_dir: PathBuf,
    /// Intent configuration file.
    pub intents_path: PathBuf,
    /// Directory for uploaded and generated images.
    pub uploads_dir: PathBuf,
    /// Session token lifetime in minutes.
    pub token_ttl_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            database_path: PathBuf::from("kaisang.db"),
            models_dir: PathBuf::from("models"),
            intents_path: PathBuf::from("data/intents.json"),
            uploads_dir: PathBuf::from("uploads"),
            token_ttl_minutes: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            KaisangError::config(format!(
                "cannot read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
