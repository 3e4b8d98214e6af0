//! flashdeck-server: HTTP CRUD API for flashcard decks and cards
//!
//! Decks own cards; both are persisted in PostgreSQL and exposed over a JSON
//! HTTP surface. Handlers talk to the store through a generic repository
//! bound to a per-request database session.

pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use http::error::ApiError;
pub use http::server::{build_router, run_server, ServerConfig};
pub use state::AppState;
