//! Per-request database sessions
//!
//! A [`Session`] owns one connection checked out of the shared pool for the
//! lifetime of a request. Dropping it returns the connection to the pool on
//! every exit path, including error returns and abandoned requests.

use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};

use super::entity::Entity;
use super::repo::Repo;

/// Request-scoped unit of work over the shared pool.
pub struct Session {
    conn: PoolConnection<Postgres>,
}

impl Session {
    /// Check a connection out of the pool.
    pub async fn acquire(pool: &PgPool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            conn: pool.acquire().await?,
        })
    }

    /// The underlying connection, for query execution.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Open a transaction on this session's connection.
    pub async fn begin(&mut self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        self.conn.begin().await
    }

    /// Build a repository for `T` bound to this session.
    pub fn repo<T: Entity>(&mut self) -> Repo<'_, T> {
        Repo::new(self)
    }
}
