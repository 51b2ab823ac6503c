//! Repair pass orchestration.
//!
//! Drives the full reconciliation flow for each requested source: scan the
//! existing verse keys per book, evaluate completeness against the canon,
//! fetch incomplete books chapter by chapter, write each returned verse
//! idempotently, and checkpoint per book. Everything runs sequentially —
//! one chapter, one book, one source at a time — to stay within the remote
//! provider's informal rate expectations, with a fixed delay after every
//! chapter fetch.
//!
//! A pass never holds a lock across a network call and is safe to re-run:
//! writes are strictly additive and duplicate keys are absorbed by the
//! store's unique index.

use std::time::Duration;

use anyhow::{bail, Result};
use sqlx::SqlitePool;

use crate::canon;
use crate::config::Config;
use crate::db;
use crate::fetch::{FetchOutcome, Provider};
use crate::models::{Book, BookReport, Source, SourceSummary};
use crate::retry::RetryPolicy;
use crate::store;

/// Completeness evaluation against the canonical expectation.
///
/// A ratio threshold rather than exact equality: verse-splitting
/// conventions differ slightly across providers, and exact-match would
/// re-fetch forever. `expected == 0` means the canon has no expectation
/// for this book, which is never treated as complete.
pub fn is_complete(existing: u64, expected: u64, threshold: f64) -> bool {
    expected > 0 && (existing as f64) >= (expected as f64) * threshold
}

fn insert_policy(config: &Config) -> RetryPolicy {
    RetryPolicy::fixed(
        config.repair.insert_retries,
        Duration::from_millis(config.repair.insert_retry_delay_ms),
    )
}

fn checkpoint_policy(config: &Config) -> RetryPolicy {
    RetryPolicy::linear(
        config.repair.checkpoint_retries,
        Duration::from_millis(config.repair.checkpoint_retry_delay_ms),
    )
}

/// Run a full reconciliation pass over the given sources (all registered
/// sources when `source_ids` is empty). Returns the per-source summaries
/// that were printed, in processing order.
pub async fn run_repair(
    config: &Config,
    source_ids: &[String],
) -> Result<Vec<(String, SourceSummary)>> {
    let pool = db::connect(config).await?;
    let provider = Provider::new(&config.provider)?;

    let registered = store::list_sources(&pool).await?;
    let targets: Vec<Source> = if source_ids.is_empty() {
        registered
    } else {
        let mut targets = Vec::new();
        for id in source_ids {
            match registered.iter().find(|s| &s.id == id) {
                Some(source) => targets.push(source.clone()),
                None => bail!("Unknown source: '{}'. Run `versemend sources` to list.", id),
            }
        }
        targets
    };

    let mut summaries = Vec::new();
    for source in &targets {
        println!("repair {} ({})", source.id, source.provider_code);
        let summary = repair_source(&pool, &provider, config, source).await?;
        println!(
            "  {}: added {} verses, ~{} still missing",
            source.id, summary.added, summary.still_missing
        );
        if summary.unmapped_books > 0 {
            println!(
                "  {}: {} books skipped (no provider mapping)",
                source.id, summary.unmapped_books
            );
        }
        summaries.push((source.id.clone(), summary));
    }

    print_summary(&summaries);

    pool.close().await;
    Ok(summaries)
}

/// Repair every book of one source, in canonical order.
async fn repair_source(
    pool: &SqlitePool,
    provider: &Provider,
    config: &Config,
    source: &Source,
) -> Result<SourceSummary> {
    let books = store::list_books(pool).await?;
    let threshold = config.repair.completeness_threshold;
    let mut summary = SourceSummary::default();

    for book in &books {
        let Some(canon_book) = canon::lookup(&book.name) else {
            eprintln!("  warning: no provider mapping for book '{}'", book.name);
            summary.unmapped_books += 1;
            continue;
        };

        let existing = store::existing_verse_keys(pool, &source.id, book.id).await?;
        let expected = canon_book.verses as u64;

        if is_complete(existing.len() as u64, expected, threshold) {
            println!("  {}: {} verses (complete)", book.name, existing.len());
            continue;
        }

        println!(
            "  {}: {}/{} verses...",
            book.name,
            existing.len(),
            expected
        );

        let report = repair_book(pool, provider, config, source, book, canon_book, existing).await?;

        store::record_checkpoint(
            pool,
            &source.id,
            book.id,
            report.added,
            &checkpoint_policy(config),
        )
        .await?;

        if report.added > 0 {
            println!("    added {} verses", report.added);
        }
        if report.failed_chapters > 0 {
            println!(
                "    {} chapters unavailable this pass",
                report.failed_chapters
            );
        }

        summary.added += report.added;
        summary.still_missing += report.still_missing();
    }

    Ok(summary)
}

/// Fetch and write one incomplete book, chapter by chapter.
///
/// A chapter whose bulk fetch yields nothing contributes zero verses and
/// never aborts the book; it stays incomplete for a later pass.
async fn repair_book(
    pool: &SqlitePool,
    provider: &Provider,
    config: &Config,
    source: &Source,
    book: &Book,
    canon_book: &canon::CanonBook,
    mut existing: std::collections::HashSet<(i64, i64)>,
) -> Result<BookReport> {
    let delay = Duration::from_millis(config.provider.request_delay_ms);
    let policy = insert_policy(config);

    let mut report = BookReport {
        existing: existing.len() as u64,
        expected: canon_book.verses as u64,
        ..Default::default()
    };

    for chapter in 1..=book.chapters {
        match provider
            .fetch_chapter(&source.provider_code, canon_book.slug, chapter)
            .await
        {
            FetchOutcome::Verses(verses) => {
                for fetched in &verses {
                    let added = store::write_verse(
                        pool,
                        &source.id,
                        book.id,
                        chapter,
                        fetched.verse,
                        &fetched.text,
                        &existing,
                        &policy,
                    )
                    .await?;

                    if added {
                        existing.insert((chapter, fetched.verse));
                        report.added += 1;
                    }
                }
            }
            FetchOutcome::NoData => {
                report.failed_chapters += 1;
            }
            FetchOutcome::Transient(reason) => {
                eprintln!(
                    "  warning: {} {} chapter {}: {}",
                    source.id, book.name, chapter, reason
                );
                report.failed_chapters += 1;
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(report)
}

/// Targeted repair of a single known-missing verse via the finer-grained
/// fetch path.
pub async fn run_fetch_verse(
    config: &Config,
    source_id: &str,
    book_name: &str,
    chapter: i64,
    verse: i64,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let provider = Provider::new(&config.provider)?;

    let Some(source) = store::get_source(&pool, source_id).await? else {
        bail!("Unknown source: '{}'", source_id);
    };
    let Some(book) = store::get_book_by_name(&pool, book_name).await? else {
        bail!("Unknown book: '{}'", book_name);
    };
    let Some(canon_book) = canon::lookup(&book.name) else {
        bail!("No provider mapping for book '{}'", book.name);
    };

    let existing = store::existing_verse_keys(&pool, &source.id, book.id).await?;
    if existing.contains(&(chapter, verse)) {
        println!("{} {} {}:{} already present", source.id, book.name, chapter, verse);
        pool.close().await;
        return Ok(());
    }

    match provider
        .fetch_verse(&source.provider_code, canon_book.slug, chapter, verse)
        .await
    {
        Some(text) => {
            let added = store::write_verse(
                &pool,
                &source.id,
                book.id,
                chapter,
                verse,
                &text,
                &existing,
                &insert_policy(config),
            )
            .await?;

            if added {
                println!("{} {} {}:{} added", source.id, book.name, chapter, verse);
            } else {
                println!(
                    "{} {} {}:{} already present (concurrent write)",
                    source.id, book.name, chapter, verse
                );
            }
        }
        None => {
            println!(
                "{} {} {}:{} unavailable from provider",
                source.id, book.name, chapter, verse
            );
        }
    }

    pool.close().await;
    Ok(())
}

fn print_summary(summaries: &[(String, SourceSummary)]) {
    println!();
    println!(
        "{:<10} {:>10} {:>16} {:>10}",
        "SOURCE", "ADDED", "STILL MISSING", "UNMAPPED"
    );
    println!("{}", "-".repeat(50));
    for (id, summary) in summaries {
        println!(
            "{:<10} {:>10} {:>16} {:>10}",
            id, summary.added, summary.still_missing, summary.unmapped_books
        );
    }
    println!("ok");
}
