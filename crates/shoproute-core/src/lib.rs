//! ShopRoute Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout ShopRoute:
//! - Tenant (shop) context and seller profile types
//! - Supported-language set with default-language invariant
//! - Layered hierarchical configuration
//! - Storage boundary traits (`ShopRepository`, `RouteStore`)
//! - Core error types

pub mod config;
pub mod context;
pub mod error;
pub mod language;
pub mod route_store;
pub mod shop;
pub mod shop_repository;

pub use context::RequestContext;
pub use error::{Error, Result};
pub use language::SupportedLanguages;
pub use route_store::RouteStore;
pub use shop::{SellerProfile, ShopId, ShopRecord, TenantContext};
pub use shop_repository::ShopRepository;
