//! Shop (tenant) types for multi-tenant storefront dispatch

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a shop row in persistent storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShopId(i64);

impl ShopId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ShopId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Immutable seller identity attached to a shop.
///
/// Carried verbatim from the shop row; rendered on invoices and contact
/// pages by downstream layers, never interpreted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub legal_name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub country: String,

    /// Company registration number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    /// VAT identification number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,

    /// Opaque payment-gateway configuration blob, passed through to the
    /// payment layer without inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_gateway: Option<serde_json::Value>,
}

/// One shop row as loaded from persistent storage.
///
/// This is what a [`crate::ShopRepository`] returns; it carries no domain
/// binding because one shop may be reachable under several domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopRecord {
    pub id: ShopId,

    /// Unique text identifier, used to address per-shop route tables and
    /// per-shop configuration layers.
    pub slug: String,

    pub name: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub seller: SellerProfile,
}

/// Resolved tenant context for one request.
///
/// Created once per request by the shop resolver, bound to exactly one
/// normalized domain, and never mutated afterwards. Share it as
/// `Arc<TenantContext>`; it is discarded when the request ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantContext {
    pub id: ShopId,
    pub slug: String,

    /// The normalized domain this context was resolved from.
    pub domain: String,

    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub seller: SellerProfile,
}

impl TenantContext {
    /// Bind a shop row to the domain it was resolved from.
    pub fn from_record(record: ShopRecord, domain: impl Into<String>) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            domain: domain.into(),
            name: record.name,
            email: record.email,
            phone: record.phone,
            seller: record.seller,
        }
    }
}
