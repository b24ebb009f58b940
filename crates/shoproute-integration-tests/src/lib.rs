//! Integration tests for ShopRoute
//!
//! The actual tests live in `tests/`; this crate exists to give them a
//! workspace member with all component crates as dependencies.
