//! Common test utilities for integration tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use shoproute_config_file::{ConfigLoader, FileRouteStore};
use shoproute_core::{
    RequestContext, Result, SellerProfile, ShopId, ShopRecord,
};
use shoproute_server::{AppState, Handler, HandlerRegistry, HandlerResponse};
use shoproute_shops::{DomainMap, InMemoryShopRepository, ShopResolver};

/// Handler that renders the resolved destination, good enough to assert
/// the whole pipeline end to end.
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn invoke(
        &self,
        action: &str,
        ctx: &RequestContext,
        params: &HashMap<String, String>,
    ) -> Result<HandlerResponse> {
        let mut rendered: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        rendered.sort_unstable();
        Ok(HandlerResponse::text(format!(
            "{}|{}|{}|{}",
            ctx.shop().slug,
            action,
            ctx.language(),
            rendered.join("&")
        )))
    }
}

#[allow(dead_code)]
pub fn shop_record(id: i64, slug: &str) -> ShopRecord {
    ShopRecord {
        id: ShopId::new(id),
        slug: slug.to_string(),
        name: format!("Shop {}", slug),
        email: format!("info@{}.example", slug),
        phone: Some("+420000000000".to_string()),
        seller: SellerProfile {
            legal_name: format!("{} s.r.o.", slug),
            street: "Dlouhá 12".to_string(),
            city: "Praha".to_string(),
            zip: "11000".to_string(),
            country: "CZ".to_string(),
            company_id: Some("12345678".to_string()),
            vat_id: Some("CZ12345678".to_string()),
            bank_account: None,
            iban: None,
            payment_gateway: None,
        },
    }
}

#[allow(dead_code)]
pub fn write_file(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Builds a complete two-shop deployment on disk plus in-memory shop rows:
/// `knihy` (books, cs default) and `hracky` (toys, cs default), each with
/// its own route table.
pub struct Deployment {
    pub state: AppState,
    pub dir: TempDir,
}

pub fn two_shop_deployment() -> Deployment {
    let dir = tempfile::tempdir().unwrap();

    write_file(
        dir.path(),
        "config/common.yaml",
        concat!(
            "languages:\n",
            "  default: cs\n",
            "  supported: [cs, en]\n",
        ),
    );

    write_file(
        dir.path(),
        "routes/knihy.yaml",
        concat!(
            "- patterns:\n",
            "    cs: kontakt\n",
            "    en: contact\n",
            "  handler: contact\n",
            "  action: default\n",
            "- pattern: \"kniha/<id \\\\d+>\"\n",
            "  handler: book\n",
            "  action: detail\n",
        ),
    );

    write_file(
        dir.path(),
        "routes/hracky.yaml",
        concat!(
            "- pattern: kontakt\n",
            "  handler: support\n",
            "  action: default\n",
        ),
    );

    let repository = InMemoryShopRepository::new();
    repository.insert(shop_record(1, "knihy"));
    repository.insert(shop_record(2, "hracky"));

    let resolver = Arc::new(ShopResolver::new(
        DomainMap::from_pairs([
            ("knihy.example", "knihy"),
            ("hracky.example", "hracky"),
        ]),
        Arc::new(repository),
    ));

    let route_store = Arc::new(FileRouteStore::new(dir.path().join("routes")).unwrap());
    let config_loader = ConfigLoader::new(dir.path().join("config")).unwrap();

    let mut registry = HandlerRegistry::new();
    for name in ["home", "contact", "support", "book", "cart"] {
        registry.register(name, Arc::new(EchoHandler));
    }

    let state = AppState::new(resolver, route_store, config_loader, Arc::new(registry));
    Deployment { state, dir }
}
