//! Route table source trait
//!
//! One route table per shop, addressed by shop slug. The store returns the
//! raw table as a JSON value; the routing crate owns deserialization into
//! route definitions so that all sources (file, database, fixture) share
//! one parser.

use async_trait::async_trait;

use crate::Result;

/// Source of per-shop route tables.
///
/// Implementations:
/// - `FileRouteStore`: one YAML/TOML file per shop (shoproute-config-file)
/// - in-memory fixtures for tests
///
/// Tables are wholly self-contained per shop; a store must never substitute
/// or merge another shop's table when the requested one is absent.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Load the route table for one shop.
    ///
    /// # Errors
    /// - `Error::RouteTableMissing` if the shop has no route table; this is
    ///   a deployment error, callers must not fall back to another table
    /// - `Error::Config` if the table exists but cannot be parsed
    async fn load_routes(&self, slug: &str) -> Result<serde_json::Value>;

    /// Slugs of all shops this store has a route table for.
    ///
    /// Used by startup validation; stores that cannot enumerate return
    /// an empty list.
    async fn list_shops(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
