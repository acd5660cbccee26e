//! The once-per-run decision between the cached price and a live fetch.

use crate::core::market::MarketClock;
use crate::core::price::PriceProvider;
use crate::core::price_cache::PriceCache;
use crate::core::state::{AppState, Transition};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub struct PriceLoader<'a> {
    cache: &'a PriceCache,
    provider: &'a (dyn PriceProvider + Send + Sync),
    clock: MarketClock,
    symbol: String,
}

impl<'a> PriceLoader<'a> {
    pub fn new(
        cache: &'a PriceCache,
        provider: &'a (dyn PriceProvider + Send + Sync),
        clock: MarketClock,
        symbol: &str,
    ) -> Self {
        Self {
            cache,
            provider,
            clock,
            symbol: symbol.to_string(),
        }
    }

    /// Serves a fresh cached price, or performs the single fetch of this run.
    /// A failed fetch leaves the cache untouched and moves the state to the
    /// fallback price.
    pub async fn load(self, state: AppState, now: DateTime<Utc>) -> AppState {
        let market_open = self.clock.is_open(now);
        if let Some(entry) = self.cache.fresh(now, market_open).await {
            debug!(price = entry.price, market_open, "Using cached price");
            return state.apply(Transition::CacheHit(entry.price));
        }

        let state = state.apply(Transition::FetchStarted);
        match self.provider.fetch_price(&self.symbol).await {
            Ok(price) => {
                info!(symbol = %self.symbol, price, "Fetched live price");
                self.cache.write(price, now).await;
                state.apply(Transition::FetchSucceeded(price))
            }
            Err(e) => {
                warn!(
                    symbol = %self.symbol,
                    reason = e.reason(),
                    error = %e,
                    "Could not fetch live price, using fallback"
                );
                state.apply(Transition::FetchFailed(e.to_string()))
            }
        }
    }
}
