//! Layered config-file loading
//!
//! Directory layout:
//!
//! ```text
//! config/
//!   common.yaml        # shared by every shop (required)
//!   local.yaml         # local/dev override (optional)
//!   shops/
//!     <slug>.yaml      # shop-specific layer (optional)
//! ```
//!
//! Layers stack common < shop < local; see
//! [`shoproute_core::config::LayeredConfig`] for the merge rules.

use std::path::{Path, PathBuf};
use tracing::debug;

use shoproute_core::config::LayeredConfig;
use shoproute_core::{Error, Result, SupportedLanguages};

use crate::route_store::read_structured_file;

/// Loads layered configuration from a config directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// # Errors
    /// - `Error::ConfigNotFound` if the common layer file is absent
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        if find_layer(&config_dir, "common").is_none() {
            return Err(Error::ConfigNotFound);
        }
        Ok(Self { config_dir })
    }

    /// Load the merged configuration, optionally with a shop layer.
    pub fn load(&self, slug: Option<&str>) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::new();

        let common = find_layer(&self.config_dir, "common").ok_or(Error::ConfigNotFound)?;
        config.push_layer(read_structured_file(&common)?);

        if let Some(slug) = slug {
            if let Some(shop_layer) = find_layer(&self.config_dir.join("shops"), slug) {
                debug!(shop = %slug, path = ?shop_layer, "applying shop config layer");
                config.push_layer(read_structured_file(&shop_layer)?);
            }
        }

        if let Some(local) = find_layer(&self.config_dir, "local") {
            debug!(path = ?local, "applying local config override");
            config.push_layer(read_structured_file(&local)?);
        }

        Ok(config)
    }
}

fn find_layer(dir: &Path, stem: &str) -> Option<PathBuf> {
    for extension in ["yaml", "yml", "toml"] {
        let candidate = dir.join(format!("{}.{}", stem, extension));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Read the `languages` section into a validated language set.
pub fn languages_from(config: &LayeredConfig) -> Result<SupportedLanguages> {
    let section = config
        .get("languages")
        .ok_or_else(|| Error::Config("missing 'languages' config section".to_string()))?;
    let languages: SupportedLanguages = serde_json::from_value(section.clone())
        .map_err(|e| Error::Config(format!("invalid 'languages' section: {}", e)))?;
    Ok(languages)
}

/// Read the `domains` section into `(domain, slug)` pairs.
pub fn domains_from(config: &LayeredConfig) -> Result<Vec<(String, String)>> {
    let section = config
        .get("domains")
        .ok_or_else(|| Error::Config("missing 'domains' config section".to_string()))?;
    let map = section
        .as_object()
        .ok_or_else(|| Error::Config("'domains' must be a mapping".to_string()))?;

    let mut pairs = Vec::with_capacity(map.len());
    for (domain, slug) in map {
        let slug = slug
            .as_str()
            .ok_or_else(|| Error::Config(format!("domain '{}' must map to a slug", domain)))?;
        pairs.push((domain.clone(), slug.to_string()));
    }
    Ok(pairs)
}
