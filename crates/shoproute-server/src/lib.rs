//! ShopRoute dispatch orchestrator
//!
//! Thin layer over the core subsystems: resolves the shop from the host
//! header, obtains the shop's compiled router, matches the path and
//! invokes the registered handler. Also exposes URL construction to
//! templates with a neutral `#` fallback.

pub mod app;
pub mod config;
pub mod handlers;
pub mod http;

pub use app::{AppState, DispatchOutcome};
pub use config::ServerConfig;
pub use handlers::{Handler, HandlerRegistry, HandlerResponse};
