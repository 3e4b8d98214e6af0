//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::db::{DbError, Session};

/// Shared application state
///
/// Holds the process-wide connection pool. Cloning is cheap; the pool is the
/// only long-lived handle, everything else is scoped to a single request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pool }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Check out a request-scoped database session.
    pub async fn session(&self) -> Result<Session, DbError> {
        Ok(Session::acquire(self.pool()).await?)
    }
}
