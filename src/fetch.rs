//! Tiered fetch client for the remote content provider.
//!
//! Two request paths against the CDN-hosted corpus API:
//! - **bulk**: one request returns every verse of a chapter
//!   (`{base}/{code}/books/{slug}/chapters/{n}.json`), used by the repair
//!   orchestrator;
//! - **single verse**: `.../chapters/{n}/verses/{v}.json`, a finer-grained
//!   path for targeted repair of individually known-missing keys. It is not
//!   chained automatically after a failed bulk fetch.
//!
//! Network failures are routine here, not exceptional: every non-success
//! status, timeout, or undecodable payload is absorbed into the outcome
//! type rather than propagated as an error. The provider's response schema
//! is not stable across translations, so payload parsing probes alternate
//! field names and drops entries it cannot make sense of.

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::models::FetchedVerse;

/// Outcome of a bulk chapter fetch.
///
/// `NoData` (provider answered but had nothing usable) and `Transient`
/// (network-level failure, worth retrying on a later pass) both contribute
/// zero verses to the current pass; they are kept distinct so callers can
/// log and count them separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Verses(Vec<FetchedVerse>),
    NoData,
    Transient(String),
}

/// HTTP client for the remote provider, built once per repair run.
pub struct Provider {
    client: reqwest::Client,
    base_url: String,
    bulk_timeout: Duration,
    verse_timeout: Duration,
}

impl Provider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bulk_timeout: Duration::from_secs(config.bulk_timeout_secs),
            verse_timeout: Duration::from_secs(config.verse_timeout_secs),
        })
    }

    /// Fetch every verse of one chapter in a single request.
    pub async fn fetch_chapter(&self, code: &str, slug: &str, chapter: i64) -> FetchOutcome {
        let url = format!(
            "{}/{}/books/{}/chapters/{}.json",
            self.base_url, code, slug, chapter
        );

        let response = match self
            .client
            .get(&url)
            .timeout(self.bulk_timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Transient(e.to_string()),
        };

        if !response.status().is_success() {
            return FetchOutcome::NoData;
        }

        let json: Value = match response.json().await {
            Ok(j) => j,
            Err(_) => return FetchOutcome::NoData,
        };

        match parse_chapter_payload(&json) {
            Some(verses) if !verses.is_empty() => FetchOutcome::Verses(verses),
            _ => FetchOutcome::NoData,
        }
    }

    /// Fetch a single verse's text. Any failure yields `None`.
    pub async fn fetch_verse(
        &self,
        code: &str,
        slug: &str,
        chapter: i64,
        verse: i64,
    ) -> Option<String> {
        let url = format!(
            "{}/{}/books/{}/chapters/{}/verses/{}.json",
            self.base_url, code, slug, chapter, verse
        );

        let response = self
            .client
            .get(&url)
            .timeout(self.verse_timeout)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let json: Value = response.json().await.ok()?;
        parse_verse_payload(&json)
    }
}

/// Extract verses from a chapter payload.
///
/// The array lives under `verses` or `data`; each entry's number under
/// `verse` or `number` (sometimes a string). Entries without a usable
/// number or with empty text are dropped.
fn parse_chapter_payload(json: &Value) -> Option<Vec<FetchedVerse>> {
    let entries = json
        .get("verses")
        .and_then(|v| v.as_array())
        .or_else(|| json.get("data").and_then(|v| v.as_array()))?;

    let mut verses = Vec::with_capacity(entries.len());
    for entry in entries {
        let number = entry
            .get("verse")
            .or_else(|| entry.get("number"))
            .and_then(value_as_i64);

        let text = entry
            .get("text")
            .and_then(|t| t.as_str())
            .map(str::trim)
            .unwrap_or("");

        match number {
            Some(n) if n > 0 && !text.is_empty() => verses.push(FetchedVerse {
                verse: n,
                text: text.to_string(),
            }),
            _ => continue,
        }
    }

    Some(verses)
}

/// Extract the text of a single-verse payload (`text` or `verse` field).
fn parse_verse_payload(json: &Value) -> Option<String> {
    let text = json
        .get("text")
        .and_then(|t| t.as_str())
        .or_else(|| json.get("verse").and_then(|t| t.as_str()))?
        .trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn value_as_i64(v: &Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_chapter_verses_field() {
        let payload = json!({
            "verses": [
                {"verse": 1, "text": "In the beginning"},
                {"verse": 2, "text": "And the earth"},
            ]
        });
        let verses = parse_chapter_payload(&payload).unwrap();
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].verse, 1);
        assert_eq!(verses[1].text, "And the earth");
    }

    #[test]
    fn test_parse_chapter_data_field_and_number_key() {
        let payload = json!({
            "data": [
                {"number": "3", "text": "And God said"},
            ]
        });
        let verses = parse_chapter_payload(&payload).unwrap();
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].verse, 3);
    }

    #[test]
    fn test_parse_chapter_drops_unusable_entries() {
        let payload = json!({
            "verses": [
                {"verse": 1, "text": "kept"},
                {"verse": 2},
                {"text": "no number"},
                {"verse": 0, "text": "bad number"},
                {"verse": 3, "text": "   "},
            ]
        });
        let verses = parse_chapter_payload(&payload).unwrap();
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].text, "kept");
    }

    #[test]
    fn test_parse_chapter_missing_array_is_none() {
        assert!(parse_chapter_payload(&json!({"error": "not found"})).is_none());
        assert!(parse_chapter_payload(&json!("just a string")).is_none());
        assert!(parse_chapter_payload(&json!({"verses": "not an array"})).is_none());
    }

    #[test]
    fn test_parse_verse_payload_alternate_field() {
        assert_eq!(
            parse_verse_payload(&json!({"text": "For God so loved"})),
            Some("For God so loved".to_string())
        );
        assert_eq!(
            parse_verse_payload(&json!({"verse": "fallback field"})),
            Some("fallback field".to_string())
        );
        assert_eq!(parse_verse_payload(&json!({"text": ""})), None);
        assert_eq!(parse_verse_payload(&json!({"other": "x"})), None);
    }
}
