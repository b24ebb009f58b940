//! ShopRoute Localized Routing Engine
//!
//! This crate turns per-shop route tables into bidirectional URL routers:
//! - Pattern DSL parsing and compilation (`pattern`)
//! - Route definition records as stored in route tables (`definition`)
//! - Localized match/construct router (`router`)
//! - Per-shop compiled-router cache (`cache`)

pub mod cache;
pub mod definition;
pub mod pattern;
pub mod router;

// Re-export commonly used types
pub use cache::RouterCache;
pub use definition::{parse_route_table, RouteDefinition};
pub use pattern::CompiledPattern;
pub use router::{LocalizedRouter, MatchResult};
