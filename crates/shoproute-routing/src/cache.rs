//! Per-shop compiled-router cache
//!
//! Route tables are low-churn, so compiled routers live until an explicit
//! invalidation (deployment, admin reload); there is no timer-based
//! eviction. The map is safe for concurrent readers across requests served
//! for different shops on the same process.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

use crate::router::LocalizedRouter;

/// Concurrent cache of compiled routers keyed by shop slug.
#[derive(Debug, Default)]
pub struct RouterCache {
    routers: DashMap<String, Arc<LocalizedRouter>>,
}

impl RouterCache {
    pub fn new() -> Self {
        Self {
            routers: DashMap::new(),
        }
    }

    pub fn get(&self, slug: &str) -> Option<Arc<LocalizedRouter>> {
        self.routers.get(slug).map(|entry| entry.value().clone())
    }

    /// Two concurrent loads of the same shop may both compile; the inputs
    /// are immutable, so either result is equivalent and the later insert
    /// simply wins.
    pub fn insert(&self, slug: impl Into<String>, router: Arc<LocalizedRouter>) {
        self.routers.insert(slug.into(), router);
    }

    pub fn invalidate(&self, slug: &str) {
        if self.routers.remove(slug).is_some() {
            info!(shop = %slug, "compiled router invalidated");
        }
    }

    pub fn invalidate_all(&self) {
        let count = self.routers.len();
        self.routers.clear();
        info!(count, "all compiled routers invalidated");
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoproute_core::SupportedLanguages;

    fn empty_router() -> Arc<LocalizedRouter> {
        Arc::new(LocalizedRouter::compile(&[], SupportedLanguages::single("cs")).unwrap())
    }

    #[test]
    fn test_get_insert_invalidate() {
        let cache = RouterCache::new();
        assert!(cache.get("knihy").is_none());

        cache.insert("knihy", empty_router());
        assert!(cache.get("knihy").is_some());
        assert_eq!(cache.len(), 1);

        cache.invalidate("knihy");
        assert!(cache.get("knihy").is_none());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = RouterCache::new();
        cache.insert("a", empty_router());
        cache.insert("b", empty_router());
        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shops_are_isolated() {
        let cache = RouterCache::new();
        cache.insert("a", empty_router());
        cache.insert("b", empty_router());
        cache.invalidate("a");
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }
}
