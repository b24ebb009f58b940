//! Host-to-tenant resolution with a process-lifetime cache

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use shoproute_core::{Error, Result, ShopRepository, TenantContext};

use crate::domain_map::{normalize_host, DomainMap};

/// Resolves a request host to the owning shop's [`TenantContext`].
///
/// Resolution is deterministic: the same host always yields the same shop
/// slug for a given domain map, regardless of what the repository row
/// currently contains. Resolved contexts are memoized per normalized
/// domain for the process lifetime; the cache is only emptied by an
/// explicit [`invalidate`](Self::invalidate) or [`clear`](Self::clear).
pub struct ShopResolver {
    domains: DomainMap,
    repository: Arc<dyn ShopRepository>,
    cache: DashMap<String, Arc<TenantContext>>,
}

impl ShopResolver {
    pub fn new(domains: DomainMap, repository: Arc<dyn ShopRepository>) -> Self {
        Self {
            domains,
            repository,
            cache: DashMap::new(),
        }
    }

    /// Resolve a raw host header value to a tenant context.
    ///
    /// # Errors
    /// - `Error::ShopNotFound` when the domain is unmapped, or mapped to a
    ///   slug whose shop row does not exist; fatal to the request, never
    ///   retried
    /// - `Error::Database` when the repository read itself fails; this is
    ///   a distinct outage condition and is never masked as a missing shop
    pub async fn resolve_from_host(&self, host: &str) -> Result<Arc<TenantContext>> {
        let domain = normalize_host(host);

        if let Some(context) = self.cache.get(&domain) {
            debug!(domain = %domain, shop = %context.slug, "shop resolved from cache");
            return Ok(context.value().clone());
        }

        let slug = self
            .domains
            .lookup(&domain)
            .ok_or_else(|| Error::ShopNotFound(domain.clone()))?;

        let record = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| Error::ShopNotFound(slug.to_string()))?;

        let context = Arc::new(TenantContext::from_record(record, domain.clone()));
        info!(domain = %domain, shop = %context.slug, id = %context.id, "shop resolved");

        self.cache.insert(domain, context.clone());
        Ok(context)
    }

    /// Drop the cached context for one domain.
    pub fn invalidate(&self, host: &str) {
        self.cache.remove(&normalize_host(host));
    }

    /// Drop all cached contexts (explicit reload).
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn domains(&self) -> &DomainMap {
        &self.domains
    }
}
