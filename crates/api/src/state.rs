//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ApiConfig;
use crate::middleware::{IdentityResolver, TrustedHeader};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: SqlitePool,
    identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    /// Create state that trusts the identity header named in the config.
    #[must_use]
    pub fn new(config: ApiConfig, pool: SqlitePool) -> Self {
        let identity = Arc::new(TrustedHeader::new(config.identity_header.clone()));
        Self::with_identity(config, pool, identity)
    }

    /// Create state with a custom identity resolver.
    #[must_use]
    pub fn with_identity(
        config: ApiConfig,
        pool: SqlitePool,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                identity,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityResolver {
        self.inner.identity.as_ref()
    }
}
