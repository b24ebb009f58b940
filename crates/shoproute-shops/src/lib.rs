//! ShopRoute Shop Resolution
//!
//! This crate maps an inbound request's host header to a tenant (shop)
//! context:
//! - Static domain → shop-slug table (`domain_map`)
//! - Host-to-tenant resolver with a process-lifetime cache (`resolver`)
//! - In-memory repository for tests and demo wiring (`memory`)

pub mod domain_map;
pub mod memory;
pub mod resolver;

pub use domain_map::DomainMap;
pub use memory::InMemoryShopRepository;
pub use resolver::ShopResolver;
