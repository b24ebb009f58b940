//! Error types for ShopRoute Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Shop resolution errors
    #[error("Shop not found: {0}")]
    ShopNotFound(String),

    // Routing errors
    #[error("Route table missing for shop: {0}")]
    RouteTableMissing(String),

    #[error("Invalid route pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid language: {0}")]
    InvalidLanguage(String),

    // Dispatch errors
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    // Storage errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
