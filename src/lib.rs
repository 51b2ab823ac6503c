//! # versemend
//!
//! Incremental reconciliation engine for a partitioned scripture text
//! corpus stored in SQLite. versemend detects gaps in each (source, book)
//! partition against a canonical reference, repairs them by fetching
//! missing chapters from a remote provider, and writes verses idempotently
//! so a pass is always safe to re-run — even with other writers on the
//! same database.
//!
//! ## Design
//!
//! ```text
//! ┌────────────┐    ┌───────────┐    ┌───────────┐    ┌──────────┐
//! │  Canon     │──▶│ Evaluator  │──▶│  Fetcher   │──▶│  Writer   │
//! │ (expected) │    │ (0.95 thr)│    │ (chapter)  │    │ (unique) │
//! └────────────┘    └───────────┘    └───────────┘    └────┬─────┘
//!        ▲                ▲                                │
//!        │           scan existing                      SQLite
//!        └──────────── orchestrator ◀───────────────── (WAL)
//! ```
//!
//! Network failures are absorbed as "no data this pass" and never abort a
//! run; store write contention is retried with bounded attempts; duplicate
//! keys under concurrent writers are swallowed via the unique index on the
//! full verse key.
//!
//! ## Quick Start
//!
//! ```bash
//! versemend init            # create database, seed sources and canon
//! versemend stats           # coverage per source
//! versemend repair          # reconcile every source
//! versemend repair KJV      # reconcile one source
//! versemend fetch-verse KJV Ruth 1 1   # targeted single-verse repair
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`canon`] | Canonical expected counts and provider mappings |
//! | [`fetch`] | Tiered fetch client (bulk chapter / single verse) |
//! | [`store`] | Existing-state scan and idempotent writes |
//! | [`repair`] | Completeness evaluation and repair orchestration |
//! | [`retry`] | Bounded retry for contended store operations |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation and seed data |

pub mod canon;
pub mod config;
pub mod db;
pub mod fetch;
pub mod migrate;
pub mod models;
pub mod repair;
pub mod retry;
pub mod sources;
pub mod stats;
pub mod store;
