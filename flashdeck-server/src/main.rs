//! flashdeck-server entry point
//!
//! Usage:
//!   flashdeck-server --bind 127.0.0.1:8000    # explicit bind address
//!   RUST_LOG=flashdeck_server=debug flashdeck-server
//!
//! Environment variables:
//!   DATABASE_URL    # PostgreSQL connection string (also via --database-url)
//!   RUST_LOG        # Log filter (default: info)

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flashdeck_server::db::{create_pool, migrations};
use flashdeck_server::{run_server, AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "flashdeck-server",
    author,
    version,
    about = "HTTP CRUD API for flashcard decks and cards"
)]
struct Cli {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    cors_permissive: bool,

    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let database_url = cli
        .database_url
        .context("DATABASE_URL not set. Set via --database-url or the environment")?;

    tracing::info!("Starting flashdeck server on {}", cli.bind);

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    let config = ServerConfig {
        bind_addr: cli.bind,
        cors_permissive: cli.cors_permissive,
    };

    run_server(AppState::new(pool), config)
        .await
        .context("Server error")?;

    Ok(())
}
