//! Application state shared across handlers.

use std::sync::Arc;

use bookshelf_catalog::Catalog;

use crate::config::ServerConfig;
use crate::templates::TemplateStore;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using
/// `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory book catalog.
    catalog: Arc<Catalog>,
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// HTML template cache.
    templates: Arc<TemplateStore>,
}

impl AppState {
    /// Create new application state with an empty catalog.
    pub fn new(config: ServerConfig) -> Self {
        let templates = TemplateStore::new(config.template_dir.clone(), config.no_cache_templates);
        Self {
            catalog: Arc::new(Catalog::new()),
            config: Arc::new(config),
            templates: Arc::new(templates),
        }
    }

    /// Get a reference to the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get a shareable handle to the catalog for the refresh task.
    pub fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a reference to the template store.
    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("books", &self.catalog.n_books())
            .finish_non_exhaustive()
    }
}
