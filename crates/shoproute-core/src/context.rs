//! Per-request context threading
//!
//! The resolved tenant and language travel through the dispatch pipeline as
//! an explicit value, never as ambient process-global state. Every
//! downstream component that needs "the current shop" or "the current
//! language" takes a `RequestContext`.

use std::sync::Arc;

use crate::shop::TenantContext;

/// Everything request-scoped that dispatch hands to a handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    shop: Arc<TenantContext>,
    language: String,
}

impl RequestContext {
    pub fn new(shop: Arc<TenantContext>, language: impl Into<String>) -> Self {
        Self {
            shop,
            language: language.into(),
        }
    }

    pub fn shop(&self) -> &TenantContext {
        &self.shop
    }

    pub fn shop_arc(&self) -> Arc<TenantContext> {
        self.shop.clone()
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}
