//! bookshelf-server: HTTP API server for the bookshelf catalog
//!
//! This crate provides:
//! - Read-only query endpoints over the in-memory catalog
//! - HTML-rendered query results and QR code generation
//! - The background refresh task wiring (fetch → load → swap)
//! - Request middleware: body limit, request IDs, tracing, CORS
//!
//! # Architecture
//!
//! The server is built on Axum. All handlers share an [`AppState`] holding
//! the catalog, the configuration, and the template cache; the refresh task
//! owns a second handle to the same catalog and replaces its dataset on a
//! timer. Handlers never block on ingest and ingest never blocks handlers
//! beyond the instant of the dataset swap.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookshelf_server::{config::ServerConfig, routes, state::AppState};
//!
//! let config = ServerConfig::from_env()?;
//! let state = AppState::new(config);
//! let app = routes::build_router(state);
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod templates;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

// Re-export dependent crates
pub use bookshelf_catalog;
pub use bookshelf_core;
pub use bookshelf_ingest;
