//! Corpus status overview.
//!
//! Gives a quick read on how complete each source is against the canonical
//! expectation, and when it was last repaired. Used by `versemend stats`
//! before and after repair runs to confirm the engine is converging.

use anyhow::Result;

use crate::canon;
use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    let canon_total: i64 = canon::BOOKS.iter().map(|b| b.verses).sum();

    println!("versemend — Corpus Stats");
    println!("========================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!("  Canon:       {} books, {} verses", canon::BOOKS.len(), canon_total);
    println!();

    let sources = store::list_sources(&pool).await?;
    if sources.is_empty() {
        println!("  No sources registered. Run `versemend init` first.");
        pool.close().await;
        return Ok(());
    }

    println!(
        "  {:<8} {:>10} {:>10}   {}",
        "SOURCE", "VERSES", "COVERAGE", "LAST REPAIR"
    );
    println!("  {}", "-".repeat(52));

    for source in &sources {
        let count = store::verse_count(&pool, &source.id).await?;
        let coverage = if canon_total > 0 {
            format!("{}%", (count * 100) / canon_total)
        } else {
            "-".to_string()
        };
        let last_repair = match store::last_checkpoint_ts(&pool, &source.id).await? {
            Some(ts) => format_ts(ts),
            None => "never".to_string(),
        };
        println!(
            "  {:<8} {:>10} {:>10}   {}",
            source.id, count, coverage, last_repair
        );
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
