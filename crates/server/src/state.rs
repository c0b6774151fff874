//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::SiteStore;
use crate::services::{ProfileService, PublishingService, WebsiteService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the document store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: SiteStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, store: SiteStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &SiteStore {
        &self.inner.store
    }

    #[must_use]
    pub fn publishing(&self) -> PublishingService<'_, SiteStore> {
        PublishingService::new(self.store(), self.config().transaction_attempts)
    }

    #[must_use]
    pub fn websites(&self) -> WebsiteService<'_, SiteStore> {
        WebsiteService::new(self.store(), self.config().transaction_attempts)
    }

    #[must_use]
    pub fn profiles(&self) -> ProfileService<'_, SiteStore> {
        ProfileService::new(self.store(), self.config().transaction_attempts)
    }
}
