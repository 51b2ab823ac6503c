//! `versemend sources` — registered sources and their provider codes.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn list_sources(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let sources = store::list_sources(&pool).await?;

    if sources.is_empty() {
        println!("No sources registered. Run `versemend init` first.");
        pool.close().await;
        return Ok(());
    }

    println!(
        "{:<8} {:<12} {:<28} {:>8}",
        "ID", "PROVIDER", "NAME", "VERSES"
    );
    println!("{}", "-".repeat(60));

    for source in &sources {
        let count = store::verse_count(&pool, &source.id).await?;
        println!(
            "{:<8} {:<12} {:<28} {:>8}",
            source.id, source.provider_code, source.name, count
        );
    }

    pool.close().await;
    Ok(())
}
