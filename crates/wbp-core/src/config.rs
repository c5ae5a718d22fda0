use std::{env, time::Duration};

use crate::{domain::Credential, errors::Error, identifiers::DedupPolicy, Result};

pub const DEFAULT_CATALOG_URL: &str =
    "https://content-api.wildberries.ru/content/v2/get/cards/list";

/// Telegram refuses albums with more than 10 items.
pub const MAX_ALBUM_SIZE: usize = 10;

/// Typed configuration, loaded once at startup and passed down explicitly.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub catalog: CatalogConfig,
    pub pipeline: PipelineConfig,

    // Outbound flood control
    pub throttle_global_interval: Duration,
    pub throttle_per_chat_interval: Duration,
}

/// Settings for the catalog lookup client.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub endpoint: String,
    /// Fallback order: first credential is tried first.
    pub credentials: Vec<Credential>,
    pub request_timeout: Duration,
}

/// Settings for one message's processing cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub max_items: usize,
    pub dedup: DedupPolicy,
    /// Pause after every catalog lookup.
    pub lookup_pacing: Duration,
    pub album_chunk_size: usize,
    /// Pause after every album send.
    pub album_pacing: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_items: 100,
            dedup: DedupPolicy::FirstOccurrence,
            lookup_pacing: Duration::from_millis(100),
            album_chunk_size: MAX_ALBUM_SIZE,
            album_pacing: Duration::from_millis(600),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CATALOG_URL.to_string(),
            credentials: Vec::new(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // A missing .env is fine; real env vars always win.
        let _ = dotenvy::dotenv();

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let credentials = collect_credentials(
            [env_str("WB_TOKEN_1"), env_str("WB_TOKEN_2")],
            env_str("WB_TOKENS"),
        );
        if credentials.is_empty() {
            tracing::warn!("no catalog credentials configured; every lookup will report not found");
        }

        let catalog = CatalogConfig {
            endpoint: env_str("WB_API_URL")
                .and_then(non_empty)
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            credentials,
            request_timeout: Duration::from_millis(env_u64("WB_TIMEOUT_MS").unwrap_or(10_000)),
        };

        let defaults = PipelineConfig::default();
        let dedup = dedup_policy(env_str("DEDUP_IDENTIFIERS").as_deref());
        let pipeline = PipelineConfig {
            max_items: env_usize("MAX_ITEMS")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_items),
            dedup,
            lookup_pacing: env_u64("LOOKUP_PACING_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.lookup_pacing),
            album_chunk_size: env_usize("ALBUM_CHUNK_SIZE")
                .unwrap_or(defaults.album_chunk_size)
                .clamp(1, MAX_ALBUM_SIZE),
            album_pacing: env_u64("ALBUM_PACING_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.album_pacing),
        };

        let throttle_global_interval =
            Duration::from_millis(env_u64("THROTTLE_GLOBAL_MS").unwrap_or(40));
        let throttle_per_chat_interval =
            Duration::from_millis(env_u64("THROTTLE_PER_CHAT_MS").unwrap_or(0));

        Ok(Self {
            telegram_bot_token,
            catalog,
            pipeline,
            throttle_global_interval,
            throttle_per_chat_interval,
        })
    }
}

/// Build the credential fallback list: numbered slots first, then the CSV extras.
fn collect_credentials<const N: usize>(
    slots: [Option<String>; N],
    extra_csv: Option<String>,
) -> Vec<Credential> {
    let extras = extra_csv
        .unwrap_or_default()
        .split(',')
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    slots
        .into_iter()
        .flatten()
        .chain(extras)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Credential::new)
        .collect()
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Recognised boolean spellings; anything else (blank included) is `None`.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Only an explicit "off" value disables dedup; unset, blank or unknown keep the default.
fn dedup_policy(raw: Option<&str>) -> DedupPolicy {
    match raw.and_then(parse_bool) {
        Some(false) => DedupPolicy::KeepAll,
        _ => DedupPolicy::FirstOccurrence,
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
