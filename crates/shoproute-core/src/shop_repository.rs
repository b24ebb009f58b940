//! Shop repository trait: the thin persistent-storage boundary

use async_trait::async_trait;

use crate::shop::{ShopId, ShopRecord};
use crate::Result;

/// Thin read-only boundary to shop storage.
///
/// A missing row is `Ok(None)`; the resolver turns that into
/// `Error::ShopNotFound`. A storage outage is `Error::Database` and must be
/// propagated as such, never masked as a missing shop.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShopRecord>>;

    async fn find_by_id(&self, id: ShopId) -> Result<Option<ShopRecord>>;
}
