//! Last known share price, persisted as two text entries.

use crate::core::cache::KeyValueCollection;
use crate::core::price::validate_price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const PRICE_KEY: &str = "schd_price";
pub const TIMESTAMP_KEY: &str = "schd_price_timestamp";

pub const DEFAULT_OPEN_TTL_MINUTES: i64 = 15;
pub const DEFAULT_CLOSED_TTL_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    pub price: f64,
    pub fetched_at_millis: i64,
}

impl CacheEntry {
    pub fn age_minutes(&self, now: DateTime<Utc>) -> f64 {
        (now.timestamp_millis() - self.fetched_at_millis) as f64 / 60_000.0
    }
}

/// How long an entry stays fresh, depending on whether the market is trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessPolicy {
    #[serde(default = "default_open_ttl")]
    pub open_ttl_minutes: i64,
    #[serde(default = "default_closed_ttl")]
    pub closed_ttl_minutes: i64,
}

fn default_open_ttl() -> i64 {
    DEFAULT_OPEN_TTL_MINUTES
}

fn default_closed_ttl() -> i64 {
    DEFAULT_CLOSED_TTL_MINUTES
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            open_ttl_minutes: DEFAULT_OPEN_TTL_MINUTES,
            closed_ttl_minutes: DEFAULT_CLOSED_TTL_MINUTES,
        }
    }
}

impl FreshnessPolicy {
    pub fn ttl_minutes(&self, market_open: bool) -> i64 {
        if market_open {
            self.open_ttl_minutes
        } else {
            self.closed_ttl_minutes
        }
    }

    /// An entry stamped in the future is never fresh.
    pub fn is_valid(&self, entry: &CacheEntry, now: DateTime<Utc>, market_open: bool) -> bool {
        let age = entry.age_minutes(now);
        age >= 0.0 && age < self.ttl_minutes(market_open) as f64
    }
}

/// Freshness check with the default 15 minute / 24 hour windows.
pub fn is_valid(entry: &CacheEntry, now: DateTime<Utc>, market_open: bool) -> bool {
    FreshnessPolicy::default().is_valid(entry, now, market_open)
}

pub struct PriceCache {
    collection: Arc<dyn KeyValueCollection>,
    policy: FreshnessPolicy,
}

impl PriceCache {
    pub fn new(collection: Arc<dyn KeyValueCollection>) -> Self {
        Self::with_policy(collection, FreshnessPolicy::default())
    }

    pub fn with_policy(collection: Arc<dyn KeyValueCollection>, policy: FreshnessPolicy) -> Self {
        Self { collection, policy }
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }

    async fn read_text(&self, key: &str) -> Option<String> {
        let bytes = self.collection.get(key.as_bytes()).await?;
        String::from_utf8(bytes).ok()
    }

    /// Reads the stored entry. Either key missing or unparsable means absent.
    pub async fn read(&self) -> Option<CacheEntry> {
        let price_text = self.read_text(PRICE_KEY).await?;
        let timestamp_text = self.read_text(TIMESTAMP_KEY).await?;

        let Some(price) = price_text.trim().parse::<f64>().ok().and_then(validate_price) else {
            debug!(value = %price_text, "Ignoring unparsable cached price");
            return None;
        };
        let Ok(fetched_at_millis) = timestamp_text.trim().parse::<i64>() else {
            debug!(value = %timestamp_text, "Ignoring unparsable cached timestamp");
            return None;
        };

        Some(CacheEntry {
            price,
            fetched_at_millis,
        })
    }

    /// Stores `price` fetched at `now`. The stored timestamp never moves
    /// backwards.
    pub async fn write(&self, price: f64, now: DateTime<Utc>) -> CacheEntry {
        let mut fetched_at_millis = now.timestamp_millis();
        if let Some(existing) = self.read().await {
            fetched_at_millis = fetched_at_millis.max(existing.fetched_at_millis);
        }

        self.collection
            .put(PRICE_KEY.as_bytes(), price.to_string().as_bytes())
            .await;
        self.collection
            .put(
                TIMESTAMP_KEY.as_bytes(),
                fetched_at_millis.to_string().as_bytes(),
            )
            .await;

        CacheEntry {
            price,
            fetched_at_millis,
        }
    }

    pub fn is_valid(&self, entry: &CacheEntry, now: DateTime<Utc>, market_open: bool) -> bool {
        self.policy.is_valid(entry, now, market_open)
    }

    /// Returns the stored entry only while it is fresh. An expired entry is
    /// reported exactly like a missing one.
    pub async fn fresh(&self, now: DateTime<Utc>, market_open: bool) -> Option<CacheEntry> {
        let entry = self.read().await?;
        if self.is_valid(&entry, now, market_open) {
            Some(entry)
        } else {
            debug!(
                age_minutes = entry.age_minutes(now),
                ttl_minutes = self.policy.ttl_minutes(market_open),
                "Cached price expired"
            );
            None
        }
    }
}
