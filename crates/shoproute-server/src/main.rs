//! ShopRoute server
//!
//! Multi-tenant storefront front controller: resolves the shop from the
//! request domain, routes the path through the shop's localized route
//! table and dispatches to a registered handler.
//!
//! Usage:
//! ```bash
//! # With a server config file
//! shoproute-server --config server.yaml
//!
//! # Overriding the listen address
//! shoproute-server --config server.yaml --listen 0.0.0.0:8080
//! ```
//!
//! The config directory is expected to carry `common.yaml` (languages,
//! domain map, shop records) plus optional `shops/<slug>.yaml` layers,
//! and the routes directory one `<slug>.yaml` route table per shop.

use anyhow::Context;
use clap::Parser;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use async_trait::async_trait;
use shoproute_config_file::{domains_from, ConfigLoader, FileRouteStore};
use shoproute_core::{RequestContext, Result as CoreResult, ShopRecord};
use shoproute_server::http;
use shoproute_server::{AppState, Handler, HandlerRegistry, HandlerResponse, ServerConfig};
use shoproute_shops::{DomainMap, InMemoryShopRepository, ShopResolver};

/// ShopRoute Server - multi-tenant localized URL dispatch
#[derive(Parser)]
#[command(name = "shoproute-server")]
#[command(about = "Multi-tenant storefront dispatch server", long_about = None)]
struct Cli {
    /// Path to the server configuration file (YAML or TOML)
    #[arg(short, long, value_name = "FILE", env = "SHOPROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long, value_name = "ADDR", env = "SHOPROUTE_LISTEN")]
    listen: Option<String>,
}

/// Plain storefront page handler used until real page handlers are
/// registered; renders the resolved destination as text.
struct StorefrontHandler;

#[async_trait]
impl Handler for StorefrontHandler {
    async fn invoke(
        &self,
        action: &str,
        ctx: &RequestContext,
        params: &HashMap<String, String>,
    ) -> CoreResult<HandlerResponse> {
        let mut rendered: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        rendered.sort_unstable();

        Ok(HandlerResponse::html(format!(
            "<h1>{}</h1><p>action: {}, language: {}, params: {{{}}}</p>",
            ctx.shop().name,
            action,
            ctx.language(),
            rendered.join(", ")
        )))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load server config from {:?}", path))?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }

    let config_loader =
        ConfigLoader::new(&config.config_dir).context("failed to open config directory")?;
    let route_store = Arc::new(
        FileRouteStore::new(&config.routes_dir).context("failed to open routes directory")?,
    );

    let common = config_loader.load(None).context("failed to load common config")?;
    let domains = DomainMap::from_pairs(domains_from(&common)?);

    // Shop rows come from the `shops` config section; a database-backed
    // ShopRepository slots in here without touching the pipeline.
    let repository = Arc::new(InMemoryShopRepository::new());
    for record in shops_from_config(&common)? {
        repository.insert(record);
    }
    if repository.is_empty() {
        warn!("no shop records configured; every request will 404");
    }

    let resolver = Arc::new(ShopResolver::new(domains, repository));

    let mut registry = HandlerRegistry::new();
    for name in ["home", "contact", "catalog", "article"] {
        registry.register(name, Arc::new(StorefrontHandler));
    }

    let state = Arc::new(AppState::new(
        resolver,
        route_store,
        config_loader,
        Arc::new(registry),
    ));

    if config.validate_routes_on_startup {
        state
            .validate_route_tables()
            .await
            .context("route table validation failed")?;
    }

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid listen address '{}'", config.listen))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("shoproute-server listening on {}", addr);
    axum::serve(listener, http::router(state)).await?;
    Ok(())
}

/// Shop records from the `shops` config section.
fn shops_from_config(
    config: &shoproute_core::config::LayeredConfig,
) -> anyhow::Result<Vec<ShopRecord>> {
    match config.get("shops") {
        Some(section) => serde_json::from_value(section.clone())
            .context("invalid 'shops' config section"),
        None => Ok(Vec::new()),
    }
}
