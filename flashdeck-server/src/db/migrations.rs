//! Database migrations for deck and card tables

use sqlx::PgPool;

/// Run all migrations. Idempotent; executed at startup before the server
/// accepts requests.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    // Create decks table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS decks (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create cards table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cards (
            id BIGSERIAL PRIMARY KEY,
            front TEXT NOT NULL,
            back TEXT,
            hint TEXT,
            deck_id BIGINT NOT NULL REFERENCES decks(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_cards_deck_id ON cards(deck_id)")
        .execute(pool)
        .await?;

    tracing::info!("Migrations complete");
    Ok(())
}
