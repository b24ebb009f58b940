//! Application state and the dispatch pipeline
//!
//! `AppState` wires the shop resolver, route store, compiled-router cache
//! and handler registry together behind dependency-injected trait objects,
//! so tests can swap file stores and repositories for in-memory ones.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use shoproute_config_file::{languages_from, ConfigLoader};
use shoproute_core::{RequestContext, Result, RouteStore};
use shoproute_routing::{parse_route_table, LocalizedRouter, RouterCache};
use shoproute_shops::ShopResolver;

use crate::handlers::{HandlerRegistry, HandlerResponse};

/// Outcome of dispatching one request.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Response(HandlerResponse),
    /// Routing ran and determined that nothing matches (a plain 404, not
    /// an error).
    NoRoute,
}

pub struct AppState {
    resolver: Arc<ShopResolver>,
    route_store: Arc<dyn RouteStore>,
    config_loader: ConfigLoader,
    routers: RouterCache,
    registry: Arc<HandlerRegistry>,
}

impl AppState {
    pub fn new(
        resolver: Arc<ShopResolver>,
        route_store: Arc<dyn RouteStore>,
        config_loader: ConfigLoader,
        registry: Arc<HandlerRegistry>,
    ) -> Self {
        Self {
            resolver,
            route_store,
            config_loader,
            routers: RouterCache::new(),
            registry,
        }
    }

    pub fn resolver(&self) -> &ShopResolver {
        &self.resolver
    }

    /// Compiled router for one shop, loading and compiling on first use.
    pub async fn router_for(&self, slug: &str) -> Result<Arc<LocalizedRouter>> {
        if let Some(router) = self.routers.get(slug) {
            return Ok(router);
        }

        let table = self.route_store.load_routes(slug).await?;
        let definitions = parse_route_table(&table)?;
        let config = self.config_loader.load(Some(slug))?;
        let languages = languages_from(&config)?;

        let router = Arc::new(LocalizedRouter::compile(&definitions, languages)?);
        info!(shop = %slug, routes = definitions.len(), "route table compiled");

        self.routers.insert(slug, router.clone());
        Ok(router)
    }

    /// Full pipeline: host → shop → router → match → handler.
    pub async fn dispatch(&self, host: &str, path: &str) -> Result<DispatchOutcome> {
        let shop = self.resolver.resolve_from_host(host).await?;
        let router = self.router_for(&shop.slug).await?;

        let Some(matched) = router.match_path(path) else {
            return Ok(DispatchOutcome::NoRoute);
        };

        let ctx = RequestContext::new(shop, matched.language.clone());
        let handler = self.registry.get(&matched.handler)?;
        let response = handler.invoke(&matched.action, &ctx, &matched.params).await?;
        Ok(DispatchOutcome::Response(response))
    }

    /// URL for a destination, for templates and redirects.
    ///
    /// An unconstructable destination renders as `#` so a bad link never
    /// aborts a page; the miss is logged here, once, at the orchestration
    /// layer.
    pub async fn url_for(
        &self,
        slug: &str,
        handler: &str,
        action: &str,
        language: &str,
        params: &HashMap<String, String>,
    ) -> String {
        let router = match self.router_for(slug).await {
            Ok(router) => router,
            Err(e) => {
                warn!(shop = %slug, error = %e, "url_for could not load router");
                return "#".to_string();
            }
        };
        match router.construct(handler, action, language, params) {
            Some(url) => url,
            None => {
                warn!(
                    shop = %slug,
                    handler, action, language,
                    "destination not constructable, rendering '#'"
                );
                "#".to_string()
            }
        }
    }

    /// Compile every shop's route table, failing on the first broken one.
    ///
    /// Run at startup so that a missing or malformed table is a deploy
    /// failure rather than a request-time 500.
    pub async fn validate_route_tables(&self) -> Result<()> {
        let slugs = self.route_store.list_shops().await?;
        for slug in &slugs {
            self.router_for(slug).await?;
        }
        info!(shops = slugs.len(), "route tables validated");
        Ok(())
    }

    /// Explicit reload: drop all cached routers and resolved shops.
    pub fn reload(&self) {
        self.routers.invalidate_all();
        self.resolver.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Handler;
    use async_trait::async_trait;
    use shoproute_config_file::FileRouteStore;
    use shoproute_core::{Error, SellerProfile, ShopId, ShopRecord};
    use shoproute_shops::{DomainMap, InMemoryShopRepository};
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        async fn invoke(
            &self,
            action: &str,
            ctx: &RequestContext,
            params: &HashMap<String, String>,
        ) -> Result<HandlerResponse> {
            let mut keys: Vec<&str> = params.keys().map(String::as_str).collect();
            keys.sort_unstable();
            Ok(HandlerResponse::text(format!(
                "{}/{}/{}?{}",
                ctx.shop().slug,
                action,
                ctx.language(),
                keys.join(",")
            )))
        }
    }

    fn record(id: i64, slug: &str) -> ShopRecord {
        ShopRecord {
            id: ShopId::new(id),
            slug: slug.to_string(),
            name: slug.to_string(),
            email: format!("info@{}.example", slug),
            phone: None,
            seller: SellerProfile {
                legal_name: slug.to_string(),
                street: String::new(),
                city: String::new(),
                zip: String::new(),
                country: "CZ".to_string(),
                company_id: None,
                vat_id: None,
                bank_account: None,
                iban: None,
                payment_gateway: None,
            },
        }
    }

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn fixture() -> (AppState, TempDir) {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "config/common.yaml",
            "languages:\n  default: cs\n  supported: [cs, en]\n",
        );
        write(
            dir.path(),
            "routes/knihy.yaml",
            "- patterns:\n    cs: kontakt\n    en: contact\n  handler: contact\n  action: default\n",
        );

        let repository = InMemoryShopRepository::new();
        repository.insert(record(1, "knihy"));

        let resolver = Arc::new(ShopResolver::new(
            DomainMap::from_pairs([("knihy.example", "knihy")]),
            Arc::new(repository),
        ));
        let route_store = Arc::new(FileRouteStore::new(dir.path().join("routes")).unwrap());
        let config_loader = ConfigLoader::new(dir.path().join("config")).unwrap();

        let mut registry = HandlerRegistry::new();
        registry.register("home", Arc::new(EchoHandler));
        registry.register("contact", Arc::new(EchoHandler));

        let state = AppState::new(resolver, route_store, config_loader, Arc::new(registry));
        (state, dir)
    }

    #[tokio::test]
    async fn test_dispatch_full_pipeline() {
        let (state, _dir) = fixture();

        let outcome = state.dispatch("knihy.example", "/en/contact").await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Response(HandlerResponse::text("knihy/default/en?"))
        );
    }

    #[tokio::test]
    async fn test_dispatch_homepage_fallback() {
        let (state, _dir) = fixture();

        let outcome = state.dispatch("knihy.example:8080", "/").await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Response(HandlerResponse::text("knihy/default/cs?"))
        );
    }

    #[tokio::test]
    async fn test_dispatch_no_route() {
        let (state, _dir) = fixture();

        // Single unknown segment: not a custom route, generic fallback
        // needs two segments, root needs zero.
        let outcome = state.dispatch("knihy.example", "/zzz").await.unwrap();
        assert_eq!(outcome, DispatchOutcome::NoRoute);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_host() {
        let (state, _dir) = fixture();

        let err = state.dispatch("ghost.example", "/").await.unwrap_err();
        assert!(matches!(err, Error::ShopNotFound(_)));
    }

    #[tokio::test]
    async fn test_dispatch_unregistered_handler() {
        let (state, _dir) = fixture();

        // The generic fallback maps any two segments to a handler name;
        // an unregistered one surfaces as HandlerNotFound.
        let err = state.dispatch("knihy.example", "/cart/add").await.unwrap_err();
        assert!(matches!(err, Error::HandlerNotFound(name) if name == "cart"));
    }

    #[tokio::test]
    async fn test_url_for_and_fallback() {
        let (state, _dir) = fixture();

        let url = state
            .url_for("knihy", "contact", "default", "en", &HashMap::new())
            .await;
        assert_eq!(url, "/en/contact");

        let missing = state
            .url_for("ghost", "contact", "default", "en", &HashMap::new())
            .await;
        assert_eq!(missing, "#");
    }

    #[tokio::test]
    async fn test_validate_route_tables() {
        let (state, dir) = fixture();
        state.validate_route_tables().await.unwrap();

        // A broken table must fail validation after reload.
        write(dir.path(), "routes/broken.yaml", "- pattern: \"a/<id\"\n  handler: h\n  action: a\n");
        state.reload();
        assert!(state.validate_route_tables().await.is_err());
    }

    #[tokio::test]
    async fn test_reload_invalidates_compiled_routers() {
        let (state, dir) = fixture();
        assert!(state.dispatch("knihy.example", "/kontakt").await.is_ok());

        // Replace the route table; the old compiled form serves until an
        // explicit reload.
        write(
            dir.path(),
            "routes/knihy.yaml",
            "- pattern: spojeni\n  handler: contact\n  action: default\n",
        );
        let outcome = state.dispatch("knihy.example", "/kontakt").await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Response(_)));

        state.reload();
        let outcome = state.dispatch("knihy.example", "/kontakt").await.unwrap();
        assert_eq!(outcome, DispatchOutcome::NoRoute);

        let outcome = state.dispatch("knihy.example", "/spojeni").await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Response(_)));
    }
}
