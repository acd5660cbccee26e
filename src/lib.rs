pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::price::PriceStatus;
use crate::cli::ui;
use crate::core::cache::Store;
use crate::core::config::AppConfig;
use crate::core::loader::PriceLoader;
use crate::core::{AppState, Estimate, MarketClock, PriceCache, Transition, YieldMethod};
use crate::providers::QuoteProvider;
use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

/// Name of the persistent collection holding the cached quote.
const QUOTE_COLLECTION: &str = "quote";

/// User edits supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct EstimateOptions {
    pub amount: Option<f64>,
    /// A manual share price. When set, no request is made.
    pub price: Option<f64>,
    pub method: Option<YieldMethod>,
    /// Print the estimate as JSON instead of tables.
    pub json: bool,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Estimate(EstimateOptions),
    History,
    Price,
}

/// Everything one run needs, built once from the configuration.
struct Session {
    config: AppConfig,
    cache: PriceCache,
    provider: QuoteProvider,
    clock: MarketClock,
    now: DateTime<Utc>,
}

impl Session {
    fn open(config: AppConfig) -> Result<Self> {
        let data_path = config.data_path()?;
        let store = KeyValueStore::open(&data_path);
        let collection = store
            .get_collection(QUOTE_COLLECTION, true, true)
            .context("Failed to open price cache")?;
        let cache = PriceCache::with_policy(collection, config.cache);
        let provider = QuoteProvider::new(config.quote_base_url())
            .context("Failed to create quote client")?;
        let clock = MarketClock::new(&config.market_timezone);

        Ok(Self {
            config,
            cache,
            provider,
            clock,
            now: Utc::now(),
        })
    }

    fn as_of(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn initial_state(&self, options: &EstimateOptions) -> AppState {
        AppState::new(
            options.amount.unwrap_or(self.config.investment),
            options.method.unwrap_or(self.config.method),
            self.config.fallback_price,
        )
    }

    async fn load_price(&self, state: AppState) -> AppState {
        let pb = ui::new_spinner("Fetching price...");
        let loader = PriceLoader::new(&self.cache, &self.provider, self.clock, &self.config.symbol);
        let state = loader.load(state, self.now).await;
        pb.finish_and_clear();
        state
    }

    async fn estimate(&self, options: &EstimateOptions) -> Estimate {
        let state = self.initial_state(options);
        let state = match options.price {
            Some(price) => {
                debug!(price, "Using manual price");
                state.apply(Transition::PriceEdited(price))
            }
            None => self.load_price(state).await,
        };

        state.estimate(&self.config.dividends, self.as_of())
    }

    async fn print_estimate(&self, options: &EstimateOptions) -> Result<()> {
        let estimate = self.estimate(options).await;
        if options.json {
            let json = serde_json::to_string_pretty(&estimate)
                .context("Failed to serialize estimate")?;
            println!("{json}");
        } else {
            println!("{}", estimate.display_as_table(&self.config.symbol));
        }
        Ok(())
    }

    async fn price(&self) -> Result<()> {
        let state = self
            .load_price(self.initial_state(&EstimateOptions::default()))
            .await;
        let market_open = self.clock.is_open(self.now);

        let status = PriceStatus {
            symbol: self.config.symbol.clone(),
            price: state.share_price,
            source: state.source,
            fetch_error: state.fetch_error,
            market_open,
            ttl_minutes: self.cache.policy().ttl_minutes(market_open),
            cached: self.cache.read().await,
            now: self.now,
        };
        println!("{}", status.display_as_table());
        Ok(())
    }
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Loads the price the same way `estimate` does and returns the result
/// without printing it.
pub async fn estimate(options: &EstimateOptions, config_path: Option<&str>) -> Result<Estimate> {
    let config = load_config(config_path)?;
    Ok(Session::open(config)?.estimate(options).await)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("divest starting...");

    let config = load_config(config_path)?;

    match command {
        AppCommand::History => {
            cli::history::run(&config.symbol, &config.dividends, Utc::now().date_naive());
            Ok(())
        }
        AppCommand::Estimate(options) => Session::open(config)?.print_estimate(&options).await,
        AppCommand::Price => Session::open(config)?.price().await,
    }
}
