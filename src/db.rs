//! SQLite connection setup.
//!
//! The engine runs one logical thread of control: fetches and writes are
//! issued strictly in sequence, so the pool is capped at a single
//! connection and the engine never competes with itself for the write
//! lock. Contention from *other* writers on the shared database is the
//! retry layer's job, so the driver-level busy timeout is kept short
//! rather than masking lock waits here.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::Config;

const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    // A fresh config may point into a data directory that does not exist yet
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}
