//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod dividend;
pub mod income;
pub mod loader;
pub mod log;
pub mod market;
pub mod price;
pub mod price_cache;
pub mod state;

// Re-export main types for cleaner imports
pub use dividend::{DividendPayment, YieldMethod};
pub use income::PeriodicIncome;
pub use market::MarketClock;
pub use price::{FetchError, PriceProvider};
pub use price_cache::{CacheEntry, PriceCache};
pub use state::{AppState, Estimate, PriceSource, Transition};
