//! File-based RouteStore implementation
//!
//! One route table file per shop, named by slug: `<routes_dir>/<slug>.yaml`
//! (`.yml` and `.toml` are also recognized, by extension). A missing file
//! is `Error::RouteTableMissing`; no other shop's table is ever
//! substituted.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use shoproute_core::{Error, Result, RouteStore};

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "toml"];

/// Route tables stored as one file per shop in a flat directory.
#[derive(Debug)]
pub struct FileRouteStore {
    routes_dir: PathBuf,
}

impl FileRouteStore {
    /// # Errors
    /// - `Error::Config` if the directory does not exist
    pub fn new(routes_dir: impl Into<PathBuf>) -> Result<Self> {
        let routes_dir = routes_dir.into();
        if !routes_dir.is_dir() {
            return Err(Error::Config(format!(
                "route table directory {:?} does not exist",
                routes_dir
            )));
        }

        info!("Initialized FileRouteStore for {:?}", routes_dir);
        Ok(Self { routes_dir })
    }

    fn table_path(&self, slug: &str) -> Result<Option<PathBuf>> {
        // Slugs address files; anything path-like is a config mistake
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::Config(format!("invalid shop slug '{}'", slug)));
        }

        for extension in EXTENSIONS {
            let candidate = self.routes_dir.join(format!("{}.{}", slug, extension));
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl RouteStore for FileRouteStore {
    async fn load_routes(&self, slug: &str) -> Result<serde_json::Value> {
        let path = self
            .table_path(slug)?
            .ok_or_else(|| Error::RouteTableMissing(slug.to_string()))?;

        debug!(shop = %slug, path = ?path, "loading route table");
        read_structured_file(&path)
    }

    async fn list_shops(&self) -> Result<Vec<String>> {
        let mut slugs = Vec::new();
        for entry in std::fs::read_dir(&self.routes_dir)? {
            let path = entry?.path();
            let is_table = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e));
            if !is_table {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                slugs.push(stem.to_string());
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}

/// Read a YAML or TOML file into a JSON value, chosen by extension
/// (YAML is the default).
pub(crate) fn read_structured_file(path: &Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        error!("Failed to read {:?}: {}", path, e);
        Error::Io(e)
    })?;

    if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid TOML in {:?}: {}", path, e)))?;
        serde_json::to_value(toml_value)
            .map_err(|e| Error::Config(format!("TOML conversion error in {:?}: {}", path, e)))
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid YAML in {:?}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_directory() {
        assert!(FileRouteStore::new("/nonexistent/routes").is_err());
    }

    #[tokio::test]
    async fn test_load_yaml_table() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("knihy.yaml"),
            "- pattern: kontakt\n  handler: contact\n  action: default\n",
        )
        .unwrap();

        let store = FileRouteStore::new(dir.path()).unwrap();
        let table = store.load_routes("knihy").await.unwrap();

        assert!(table.is_array());
        assert_eq!(table[0]["handler"], "contact");
    }

    #[tokio::test]
    async fn test_load_toml_table() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("knihy.toml"),
            "[[route]]\npattern = \"kontakt\"\nhandler = \"contact\"\naction = \"default\"\n",
        )
        .unwrap();

        let store = FileRouteStore::new(dir.path()).unwrap();
        let table = store.load_routes("knihy").await.unwrap();
        assert_eq!(table["route"][0]["handler"], "contact");
    }

    #[tokio::test]
    async fn test_missing_table_is_route_table_missing() {
        let dir = tempdir().unwrap();
        let store = FileRouteStore::new(dir.path()).unwrap();

        let err = store.load_routes("ghost").await.unwrap_err();
        assert!(matches!(err, Error::RouteTableMissing(slug) if slug == "ghost"));
    }

    #[tokio::test]
    async fn test_path_like_slug_rejected() {
        let dir = tempdir().unwrap();
        let store = FileRouteStore::new(dir.path()).unwrap();

        assert!(store.load_routes("../other").await.is_err());
        assert!(store.load_routes("").await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_config_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "{broken: [").unwrap();

        let store = FileRouteStore::new(dir.path()).unwrap();
        let err = store.load_routes("bad").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_list_shops() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.yaml"), "[]").unwrap();
        std::fs::write(dir.path().join("a.yml"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let store = FileRouteStore::new(dir.path()).unwrap();
        assert_eq!(store.list_shops().await.unwrap(), vec!["a", "b"]);
    }
}
