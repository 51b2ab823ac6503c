//! Canonical reference data: the completeness oracle.
//!
//! Static table of expected chapter and verse counts per book, plus the
//! provider-side name for each book. Pure data; [`lookup`] returning `None`
//! is the "no expectation" sentinel and callers must treat such books as
//! unverifiable (conservatively incomplete), never as complete.
//!
//! Verse totals are the Protestant canon counts. Providers that split or
//! merge verses differently will land slightly off these numbers, which is
//! why completeness is evaluated against a ratio threshold rather than
//! exact equality.

/// Canonical expectations for one book.
#[derive(Debug, Clone, Copy)]
pub struct CanonBook {
    /// Book name as stored in the `books` table.
    pub name: &'static str,
    /// Book name as addressed by the remote provider.
    pub slug: &'static str,
    pub chapters: i64,
    /// Expected total verse count across all chapters.
    pub verses: i64,
}

/// Sources registered at `init`: (id, provider code, display name).
pub const DEFAULT_SOURCES: &[(&str, &str, &str)] = &[
    ("KJV", "en-kjv", "King James Version"),
    ("ASV", "en-asv", "American Standard Version"),
    ("WEB", "en-web", "World English Bible"),
];

/// All 66 books in canonical order (ordinal = index + 1).
pub const BOOKS: &[CanonBook] = &[
    CanonBook { name: "Genesis", slug: "genesis", chapters: 50, verses: 1533 },
    CanonBook { name: "Exodus", slug: "exodus", chapters: 40, verses: 1213 },
    CanonBook { name: "Leviticus", slug: "leviticus", chapters: 27, verses: 859 },
    CanonBook { name: "Numbers", slug: "numbers", chapters: 36, verses: 1288 },
    CanonBook { name: "Deuteronomy", slug: "deuteronomy", chapters: 34, verses: 959 },
    CanonBook { name: "Joshua", slug: "joshua", chapters: 24, verses: 658 },
    CanonBook { name: "Judges", slug: "judges", chapters: 21, verses: 618 },
    CanonBook { name: "Ruth", slug: "ruth", chapters: 4, verses: 85 },
    CanonBook { name: "1 Samuel", slug: "1-samuel", chapters: 31, verses: 810 },
    CanonBook { name: "2 Samuel", slug: "2-samuel", chapters: 24, verses: 695 },
    CanonBook { name: "1 Kings", slug: "1-kings", chapters: 22, verses: 816 },
    CanonBook { name: "2 Kings", slug: "2-kings", chapters: 25, verses: 719 },
    CanonBook { name: "1 Chronicles", slug: "1-chronicles", chapters: 29, verses: 942 },
    CanonBook { name: "2 Chronicles", slug: "2-chronicles", chapters: 36, verses: 822 },
    CanonBook { name: "Ezra", slug: "ezra", chapters: 10, verses: 280 },
    CanonBook { name: "Nehemiah", slug: "nehemiah", chapters: 13, verses: 406 },
    CanonBook { name: "Esther", slug: "esther", chapters: 10, verses: 167 },
    CanonBook { name: "Job", slug: "job", chapters: 42, verses: 1070 },
    CanonBook { name: "Psalms", slug: "psalms", chapters: 150, verses: 2461 },
    CanonBook { name: "Proverbs", slug: "proverbs", chapters: 31, verses: 915 },
    CanonBook { name: "Ecclesiastes", slug: "ecclesiastes", chapters: 12, verses: 222 },
    CanonBook { name: "Song of Solomon", slug: "song-of-solomon", chapters: 8, verses: 117 },
    CanonBook { name: "Isaiah", slug: "isaiah", chapters: 66, verses: 1292 },
    CanonBook { name: "Jeremiah", slug: "jeremiah", chapters: 52, verses: 1364 },
    CanonBook { name: "Lamentations", slug: "lamentations", chapters: 5, verses: 154 },
    CanonBook { name: "Ezekiel", slug: "ezekiel", chapters: 48, verses: 1273 },
    CanonBook { name: "Daniel", slug: "daniel", chapters: 12, verses: 357 },
    CanonBook { name: "Hosea", slug: "hosea", chapters: 14, verses: 197 },
    CanonBook { name: "Joel", slug: "joel", chapters: 3, verses: 73 },
    CanonBook { name: "Amos", slug: "amos", chapters: 9, verses: 146 },
    CanonBook { name: "Obadiah", slug: "obadiah", chapters: 1, verses: 21 },
    CanonBook { name: "Jonah", slug: "jonah", chapters: 4, verses: 48 },
    CanonBook { name: "Micah", slug: "micah", chapters: 7, verses: 105 },
    CanonBook { name: "Nahum", slug: "nahum", chapters: 3, verses: 47 },
    CanonBook { name: "Habakkuk", slug: "habakkuk", chapters: 3, verses: 56 },
    CanonBook { name: "Zephaniah", slug: "zephaniah", chapters: 3, verses: 53 },
    CanonBook { name: "Haggai", slug: "haggai", chapters: 2, verses: 38 },
    CanonBook { name: "Zechariah", slug: "zechariah", chapters: 14, verses: 211 },
    CanonBook { name: "Malachi", slug: "malachi", chapters: 4, verses: 55 },
    CanonBook { name: "Matthew", slug: "matthew", chapters: 28, verses: 1071 },
    CanonBook { name: "Mark", slug: "mark", chapters: 16, verses: 678 },
    CanonBook { name: "Luke", slug: "luke", chapters: 24, verses: 1151 },
    CanonBook { name: "John", slug: "john", chapters: 21, verses: 879 },
    CanonBook { name: "Acts", slug: "acts", chapters: 28, verses: 1007 },
    CanonBook { name: "Romans", slug: "romans", chapters: 16, verses: 433 },
    CanonBook { name: "1 Corinthians", slug: "1-corinthians", chapters: 16, verses: 437 },
    CanonBook { name: "2 Corinthians", slug: "2-corinthians", chapters: 13, verses: 257 },
    CanonBook { name: "Galatians", slug: "galatians", chapters: 6, verses: 149 },
    CanonBook { name: "Ephesians", slug: "ephesians", chapters: 6, verses: 155 },
    CanonBook { name: "Philippians", slug: "philippians", chapters: 4, verses: 104 },
    CanonBook { name: "Colossians", slug: "colossians", chapters: 4, verses: 95 },
    CanonBook { name: "1 Thessalonians", slug: "1-thessalonians", chapters: 5, verses: 89 },
    CanonBook { name: "2 Thessalonians", slug: "2-thessalonians", chapters: 3, verses: 47 },
    CanonBook { name: "1 Timothy", slug: "1-timothy", chapters: 6, verses: 113 },
    CanonBook { name: "2 Timothy", slug: "2-timothy", chapters: 4, verses: 83 },
    CanonBook { name: "Titus", slug: "titus", chapters: 3, verses: 46 },
    CanonBook { name: "Philemon", slug: "philemon", chapters: 1, verses: 25 },
    CanonBook { name: "Hebrews", slug: "hebrews", chapters: 13, verses: 303 },
    CanonBook { name: "James", slug: "james", chapters: 5, verses: 108 },
    CanonBook { name: "1 Peter", slug: "1-peter", chapters: 5, verses: 105 },
    CanonBook { name: "2 Peter", slug: "2-peter", chapters: 3, verses: 61 },
    CanonBook { name: "1 John", slug: "1-john", chapters: 5, verses: 105 },
    CanonBook { name: "2 John", slug: "2-john", chapters: 1, verses: 13 },
    CanonBook { name: "3 John", slug: "3-john", chapters: 1, verses: 14 },
    CanonBook { name: "Jude", slug: "jude", chapters: 1, verses: 25 },
    CanonBook { name: "Revelation", slug: "revelation", chapters: 22, verses: 404 },
];

/// Look up canonical expectations by stored book name.
///
/// `None` means the book cannot be verified against the canon; callers must
/// treat it as incomplete rather than skip it silently.
pub fn lookup(name: &str) -> Option<&'static CanonBook> {
    BOOKS.iter().find(|b| b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_book() {
        let ruth = lookup("Ruth").unwrap();
        assert_eq!(ruth.chapters, 4);
        assert_eq!(ruth.verses, 85);
        assert_eq!(ruth.slug, "ruth");
    }

    #[test]
    fn test_lookup_unknown_book_is_sentinel() {
        assert!(lookup("Enoch").is_none());
    }

    #[test]
    fn test_canon_has_sixty_six_books() {
        assert_eq!(BOOKS.len(), 66);
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut slugs: Vec<&str> = BOOKS.iter().map(|b| b.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), BOOKS.len());
    }
}
