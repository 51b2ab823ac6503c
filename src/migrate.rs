//! Idempotent schema creation and canonical seed data.
//!
//! `versemend init` creates the tables the engine reads and writes, then
//! seeds the default sources and the canonical book list. Everything is
//! `IF NOT EXISTS` / `INSERT OR IGNORE`, so re-running init is safe and
//! never disturbs verses already present.

use anyhow::Result;

use crate::canon;
use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id TEXT PRIMARY KEY,
            provider_code TEXT NOT NULL,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            chapters INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // The unique index on the full verse key is the store-level duplicate
    // guard the idempotent writer relies on.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS verses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id TEXT NOT NULL,
            book_id INTEGER NOT NULL,
            chapter INTEGER NOT NULL,
            verse INTEGER NOT NULL,
            text TEXT NOT NULL,
            UNIQUE(source_id, book_id, chapter, verse),
            FOREIGN KEY (book_id) REFERENCES books(id)
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS repair_checkpoints (
            source_id TEXT NOT NULL,
            book_id INTEGER NOT NULL,
            added INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (source_id, book_id)
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_verses_partition ON verses(source_id, book_id)",
    )
    .execute(&pool)
    .await?;

    // Seed default sources and the canonical book list
    for (id, provider_code, name) in canon::DEFAULT_SOURCES.iter().copied() {
        sqlx::query("INSERT OR IGNORE INTO sources (id, provider_code, name) VALUES (?, ?, ?)")
            .bind(id)
            .bind(provider_code)
            .bind(name)
            .execute(&pool)
            .await?;
    }

    for (index, book) in canon::BOOKS.iter().enumerate() {
        sqlx::query("INSERT OR IGNORE INTO books (id, name, chapters) VALUES (?, ?, ?)")
            .bind((index + 1) as i64)
            .bind(book.name)
            .bind(book.chapters)
            .execute(&pool)
            .await?;
    }

    pool.close().await;
    Ok(())
}
