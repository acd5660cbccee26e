use crate::core::price::{FetchError, PriceProvider, validate_price};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

/// Client for the quote endpoint: `GET {base_url}/api/quote/{symbol}`
/// answering `{"price": <number>}`, or a JSON `{"error": ...}` body with a
/// 4xx/5xx status.
pub struct QuoteProvider {
    base_url: String,
    client: reqwest::Client,
}

impl QuoteProvider {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("divest/1.0")
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, symbol: &str) -> String {
        format!("{}/api/quote/{}", self.base_url, symbol)
    }
}

fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Extracts a positive price from a quote response body.
fn parse_price(body: &str) -> Result<f64, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    let field = value.get("price").ok_or(FetchError::MissingPrice)?;
    field
        .as_f64()
        .and_then(validate_price)
        .ok_or_else(|| FetchError::InvalidPrice(field.to_string()))
}

#[async_trait]
impl PriceProvider for QuoteProvider {
    #[instrument(name = "QuoteFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FetchError> {
        let url = self.url(symbol);
        debug!("Requesting price from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "Received quote response");

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                detail: error_detail(&body),
            });
        }

        parse_price(&body)
    }
}
