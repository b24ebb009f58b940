//! Handler registry
//!
//! A route resolves to a handler name and an action name; the registry
//! maps the name to a `Handler` implementation. A name with no entry is
//! `Error::HandlerNotFound`, a first-class error rather than any kind of
//! reflective type lookup.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use shoproute_core::{Error, RequestContext, Result};

/// What a handler produces; the HTTP layer turns it into a response.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl HandlerResponse {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.into(),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: body.into(),
        }
    }
}

/// One logical unit of actions a route can target.
///
/// The action name is dispatched inside the handler; an unknown action is
/// the handler's own concern (typically a 404-style response).
#[async_trait]
pub trait Handler: Send + Sync {
    async fn invoke(
        &self,
        action: &str,
        ctx: &RequestContext,
        params: &HashMap<String, String>,
    ) -> Result<HandlerResponse>;
}

impl std::fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Handler")
    }
}

/// Name → handler map, populated at startup and immutable afterwards.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn Handler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// # Errors
    /// - `Error::HandlerNotFound` when no handler is registered under the
    ///   name (exact match, no case folding)
    pub fn get(&self, name: &str) -> Result<Arc<dyn Handler>> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::HandlerNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        async fn invoke(
            &self,
            action: &str,
            ctx: &RequestContext,
            _params: &HashMap<String, String>,
        ) -> Result<HandlerResponse> {
            Ok(HandlerResponse::text(format!(
                "{}:{}@{}",
                ctx.shop().slug,
                action,
                ctx.language()
            )))
        }
    }

    fn sample_context() -> RequestContext {
        use shoproute_core::{SellerProfile, ShopId, ShopRecord, TenantContext};
        let record = ShopRecord {
            id: ShopId::new(1),
            slug: "knihy".to_string(),
            name: "Knihy".to_string(),
            email: "info@knihy.example".to_string(),
            phone: None,
            seller: SellerProfile {
                legal_name: "Knihy s.r.o.".to_string(),
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
        };
        RequestContext::new(
            Arc::new(TenantContext::from_record(record, "knihy.example")),
            "cs",
        )
    }

    #[tokio::test]
    async fn test_registry_lookup_and_invoke() {
        let mut registry = HandlerRegistry::new();
        registry.register("home", Arc::new(EchoHandler));

        let handler = registry.get("home").unwrap();
        let response = handler
            .invoke("default", &sample_context(), &HashMap::new())
            .await
            .unwrap();
        assert_eq!(response.body, "knihy:default@cs");
    }

    #[test]
    fn test_missing_handler() {
        let registry = HandlerRegistry::new();
        let err = registry.get("ghost").unwrap_err();
        assert!(matches!(err, Error::HandlerNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let mut registry = HandlerRegistry::new();
        registry.register("home", Arc::new(EchoHandler));
        assert!(registry.contains("home"));
        assert!(!registry.contains("Home"));
    }
}
