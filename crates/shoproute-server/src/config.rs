//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use shoproute_core::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Directory with common.yaml / shops/<slug>.yaml / local.yaml layers.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Directory with one route table file per shop.
    #[serde(default = "default_routes_dir")]
    pub routes_dir: PathBuf,

    /// Fail startup when any shop's route table does not compile.
    #[serde(default = "default_true")]
    pub validate_routes_on_startup: bool,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_routes_dir() -> PathBuf {
    PathBuf::from("routes")
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            config_dir: default_config_dir(),
            routes_dir: default_routes_dir(),
            validate_routes_on_startup: true,
        }
    }
}

impl ServerConfig {
    /// Load from a YAML or TOML file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("invalid TOML in {:?}: {}", path, e)))
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("invalid YAML in {:?}: {}", path, e)))
        }
    }
}
