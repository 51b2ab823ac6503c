//! Core data models used throughout versemend.
//!
//! These types represent the sources, books, and fetched verses that flow
//! through the reconciliation pipeline, plus the per-book and per-source
//! statistics accumulated during a repair pass.

/// A registered corpus variant (one translation). Immutable once registered.
#[derive(Debug, Clone)]
pub struct Source {
    pub id: String,
    pub provider_code: String,
    pub name: String,
}

/// A book row as stored, in canonical order (`id` is the ordinal).
/// `chapters` is the iteration bound for the book's repair loop.
#[derive(Debug, Clone)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub chapters: i64,
}

/// One verse as returned by the remote provider, before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedVerse {
    pub verse: i64,
    pub text: String,
}

/// Transient per-book statistics, folded into [`SourceSummary`] after the
/// book's checkpoint is written.
#[derive(Debug, Clone, Default)]
pub struct BookReport {
    pub existing: u64,
    pub expected: u64,
    pub added: u64,
    pub failed_chapters: u64,
}

impl BookReport {
    /// Best-effort gap estimate. Computed without re-scanning the store, so
    /// it cannot see writes that raced in from elsewhere during this pass.
    pub fn still_missing(&self) -> u64 {
        self.expected.saturating_sub(self.existing + self.added)
    }
}

/// Per-source totals reported in the final summary.
#[derive(Debug, Clone, Default)]
pub struct SourceSummary {
    pub added: u64,
    pub still_missing: u64,
    pub unmapped_books: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_missing_floors_at_zero() {
        let report = BookReport {
            existing: 80,
            expected: 85,
            added: 10,
            failed_chapters: 0,
        };
        assert_eq!(report.still_missing(), 0);
    }

    #[test]
    fn test_still_missing_counts_gap() {
        let report = BookReport {
            existing: 80,
            expected: 85,
            added: 2,
            failed_chapters: 1,
        };
        assert_eq!(report.still_missing(), 3);
    }
}
