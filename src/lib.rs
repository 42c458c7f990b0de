pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod sort_utils;
pub mod state;
pub mod text_utils;

/// Application version from Cargo.toml (single source of truth)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
