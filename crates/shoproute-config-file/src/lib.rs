//! File-based configuration and route table sources for ShopRoute
//!
//! - `route_store`: one route table file per shop, addressed by slug
//! - `loader`: layered config files (common → shop-specific → local)

pub mod loader;
pub mod route_store;

pub use loader::{domains_from, languages_from, ConfigLoader};
pub use route_store::FileRouteStore;
