//! Database layer - connection pool, per-request sessions, and the generic
//! repository
//!
//! # Design Principles
//!
//! - Connection pool, one checked-out connection per request
//! - SQL assembled from entity metadata, parameters always bound
//! - Batch updates run in a transaction, rely on DB constraints otherwise

pub mod entity;
pub mod migrations;
pub mod pool;
pub mod repo;
pub mod session;

pub use entity::{Entity, Relation};
pub use pool::create_pool;
pub use repo::{DbError, FilterValue, Repo};
pub use session::Session;
