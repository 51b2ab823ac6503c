//! Store access: existing-state scanning and the idempotent write path.
//!
//! The `verses` table is shared with other potential writers, so the write
//! path never assumes the existing-key snapshot is still accurate by the
//! time an insert lands. The unique index on the full verse key is the only
//! duplicate guard that matters; everything else here is about reporting
//! `added = false` instead of failing when that guard fires.

use std::collections::HashSet;

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::models::{Book, Source};
use crate::retry::{is_busy, is_unique_violation, retry_db, RetryPolicy};

/// Registered sources, in registration order.
pub async fn list_sources(pool: &SqlitePool) -> Result<Vec<Source>> {
    let rows = sqlx::query("SELECT id, provider_code, name FROM sources ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| Source {
            id: row.get("id"),
            provider_code: row.get("provider_code"),
            name: row.get("name"),
        })
        .collect())
}

pub async fn get_source(pool: &SqlitePool, id: &str) -> Result<Option<Source>> {
    let row = sqlx::query("SELECT id, provider_code, name FROM sources WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Source {
        id: row.get("id"),
        provider_code: row.get("provider_code"),
        name: row.get("name"),
    }))
}

/// All books in canonical order.
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let rows = sqlx::query("SELECT id, name, chapters FROM books ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| Book {
            id: row.get("id"),
            name: row.get("name"),
            chapters: row.get("chapters"),
        })
        .collect())
}

pub async fn get_book_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Book>> {
    let row = sqlx::query("SELECT id, name, chapters FROM books WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Book {
        id: row.get("id"),
        name: row.get("name"),
        chapters: row.get("chapters"),
    }))
}

/// Scan the set of (chapter, verse) keys already present for one
/// (source, book) partition. One consistent read per repair pass; never
/// cached across books.
pub async fn existing_verse_keys(
    pool: &SqlitePool,
    source_id: &str,
    book_id: i64,
) -> Result<HashSet<(i64, i64)>> {
    let rows = sqlx::query("SELECT chapter, verse FROM verses WHERE source_id = ? AND book_id = ?")
        .bind(source_id)
        .bind(book_id)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get::<i64, _>("chapter"), row.get::<i64, _>("verse")))
        .collect())
}

/// Idempotently write one verse. Returns whether a row was actually added.
///
/// Keys already in `existing` are skipped without touching the store. A
/// unique-violation from a concurrent writer that beat us to the key is
/// swallowed as `added = false`; busy/locked is retried per `policy` and
/// only its exhaustion propagates as an error.
pub async fn write_verse(
    pool: &SqlitePool,
    source_id: &str,
    book_id: i64,
    chapter: i64,
    verse: i64,
    text: &str,
    existing: &HashSet<(i64, i64)>,
    policy: &RetryPolicy,
) -> Result<bool> {
    if existing.contains(&(chapter, verse)) {
        return Ok(false);
    }

    let result = retry_db(policy, is_busy, || {
        sqlx::query(
            "INSERT INTO verses (source_id, book_id, chapter, verse, text) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(source_id)
        .bind(book_id)
        .bind(chapter)
        .bind(verse)
        .bind(text)
        .execute(pool)
    })
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(err) if is_unique_violation(&err) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Record the per-book durability checkpoint at the end of a book's repair.
///
/// Retried per `policy` (increasing delay); exhaustion is fatal for the run,
/// since continuing past a checkpoint that cannot be written risks losing
/// track of what this pass accomplished.
pub async fn record_checkpoint(
    pool: &SqlitePool,
    source_id: &str,
    book_id: i64,
    added: u64,
    policy: &RetryPolicy,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    retry_db(policy, is_busy, || {
        sqlx::query(
            r#"
            INSERT INTO repair_checkpoints (source_id, book_id, added, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(source_id, book_id) DO UPDATE SET
                added = excluded.added,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(source_id)
        .bind(book_id)
        .bind(added as i64)
        .bind(now)
        .execute(pool)
    })
    .await?;

    Ok(())
}

/// Total verses stored for one source.
pub async fn verse_count(pool: &SqlitePool, source_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM verses WHERE source_id = ?")
        .bind(source_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Timestamp of the most recent repair checkpoint for a source, if any.
pub async fn last_checkpoint_ts(pool: &SqlitePool, source_id: &str) -> Result<Option<i64>> {
    let ts: Option<i64> =
        sqlx::query_scalar("SELECT MAX(updated_at) FROM repair_checkpoints WHERE source_id = ?")
            .bind(source_id)
            .fetch_one(pool)
            .await?;
    Ok(ts)
}
