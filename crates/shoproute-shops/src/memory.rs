//! In-memory shop repository for tests and demo wiring

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use shoproute_core::{Result, ShopId, ShopRecord, ShopRepository};

/// `HashMap`-backed repository keyed by shop slug.
#[derive(Debug, Default)]
pub struct InMemoryShopRepository {
    shops: Mutex<HashMap<String, ShopRecord>>,
}

impl InMemoryShopRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: ShopRecord) {
        self.shops
            .lock()
            .expect("shop map poisoned")
            .insert(record.slug.clone(), record);
    }

    pub fn remove(&self, slug: &str) -> Option<ShopRecord> {
        self.shops.lock().expect("shop map poisoned").remove(slug)
    }

    pub fn len(&self) -> usize {
        self.shops.lock().expect("shop map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ShopRepository for InMemoryShopRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShopRecord>> {
        Ok(self
            .shops
            .lock()
            .expect("shop map poisoned")
            .get(slug)
            .cloned())
    }

    async fn find_by_id(&self, id: ShopId) -> Result<Option<ShopRecord>> {
        Ok(self
            .shops
            .lock()
            .expect("shop map poisoned")
            .values()
            .find(|record| record.id == id)
            .cloned())
    }
}
