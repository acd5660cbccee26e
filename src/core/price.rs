//! Share price abstractions

use async_trait::async_trait;
use thiserror::Error;

/// Every way a quote request can go wrong. All of them are recovered the same
/// way by the caller; the variant is only used for reporting.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {status}{}", detail_suffix(.detail))]
    Status {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
    #[error("Malformed quote response: {0}")]
    Malformed(String),
    #[error("Quote response has no price field")]
    MissingPrice,
    #[error("Invalid price in quote response: {0}")]
    InvalidPrice(String),
    #[error("Request error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// Short, stable label used in logs and the status line.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "http_status",
            FetchError::Malformed(_) => "malformed_json",
            FetchError::MissingPrice => "missing_price",
            FetchError::InvalidPrice(_) => "invalid_price",
            FetchError::Network(_) => "network",
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Performs exactly one request for the latest price of `symbol`.
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FetchError>;
}

/// Returns the price if it is a usable share price.
pub fn validate_price(price: f64) -> Option<f64> {
    (price.is_finite() && price > 0.0).then_some(price)
}
