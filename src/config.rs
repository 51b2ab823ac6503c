use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub repair: RepairConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_bulk_timeout_secs")]
    pub bulk_timeout_secs: u64,
    #[serde(default = "default_verse_timeout_secs")]
    pub verse_timeout_secs: u64,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bulk_timeout_secs: default_bulk_timeout_secs(),
            verse_timeout_secs: default_verse_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://cdn.jsdelivr.net/gh/wldeh/bible-api/bibles".to_string()
}
fn default_bulk_timeout_secs() -> u64 {
    30
}
fn default_verse_timeout_secs() -> u64 {
    10
}
fn default_request_delay_ms() -> u64 {
    100
}
fn default_user_agent() -> String {
    "versemend/0.1".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RepairConfig {
    /// Fraction of canonical verses that counts as "complete" (0.0, 1.0].
    /// Verse-splitting conventions vary slightly across providers, so 1.0
    /// causes perpetual re-fetching against most of them.
    #[serde(default = "default_completeness_threshold")]
    pub completeness_threshold: f64,
    #[serde(default = "default_insert_retries")]
    pub insert_retries: u32,
    #[serde(default = "default_insert_retry_delay_ms")]
    pub insert_retry_delay_ms: u64,
    #[serde(default = "default_checkpoint_retries")]
    pub checkpoint_retries: u32,
    #[serde(default = "default_checkpoint_retry_delay_ms")]
    pub checkpoint_retry_delay_ms: u64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            completeness_threshold: default_completeness_threshold(),
            insert_retries: default_insert_retries(),
            insert_retry_delay_ms: default_insert_retry_delay_ms(),
            checkpoint_retries: default_checkpoint_retries(),
            checkpoint_retry_delay_ms: default_checkpoint_retry_delay_ms(),
        }
    }
}

fn default_completeness_threshold() -> f64 {
    0.95
}
fn default_insert_retries() -> u32 {
    3
}
fn default_insert_retry_delay_ms() -> u64 {
    1000
}
fn default_checkpoint_retries() -> u32 {
    5
}
fn default_checkpoint_retry_delay_ms() -> u64 {
    2000
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.provider.base_url.is_empty() {
        anyhow::bail!("provider.base_url must not be empty");
    }

    let threshold = config.repair.completeness_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        anyhow::bail!("repair.completeness_threshold must be in (0.0, 1.0]");
    }

    if config.repair.insert_retries == 0 {
        anyhow::bail!("repair.insert_retries must be >= 1");
    }
    if config.repair.checkpoint_retries == 0 {
        anyhow::bail!("repair.checkpoint_retries must be >= 1");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("[db]\npath = \"x.sqlite\"\n").unwrap();
        assert_eq!(config.repair.completeness_threshold, 0.95);
        assert_eq!(config.repair.insert_retries, 3);
        assert_eq!(config.repair.checkpoint_retries, 5);
        assert_eq!(config.provider.bulk_timeout_secs, 30);
        assert_eq!(config.provider.verse_timeout_secs, 10);
    }

    #[test]
    fn test_threshold_of_one_is_valid() {
        let config: Config = toml::from_str(
            "[db]\npath = \"x.sqlite\"\n[repair]\ncompleteness_threshold = 1.0\n",
        )
        .unwrap();
        assert_eq!(config.repair.completeness_threshold, 1.0);
    }
}
