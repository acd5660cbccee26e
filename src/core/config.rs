use crate::core::dividend::{DividendPayment, YieldMethod};
use crate::core::market::DEFAULT_MARKET_TIMEZONE;
use crate::core::price_cache::FreshnessPolicy;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_SYMBOL: &str = "SCHD";
pub const DEFAULT_FALLBACK_PRICE: f64 = 27.50;
pub const DEFAULT_INVESTMENT: f64 = 10_000.0;
pub const DEFAULT_QUOTE_URL: &str = "http://localhost:3000";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoteProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub quote: Option<QuoteProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            quote: Some(QuoteProviderConfig {
                base_url: DEFAULT_QUOTE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_investment")]
    pub investment: f64,
    #[serde(default)]
    pub method: YieldMethod,
    #[serde(default = "default_fallback_price")]
    pub fallback_price: f64,
    #[serde(default = "default_market_timezone")]
    pub market_timezone: String,
    #[serde(default)]
    pub cache: FreshnessPolicy,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
    /// Newest first.
    pub dividends: Vec<DividendPayment>,
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}

fn default_investment() -> f64 {
    DEFAULT_INVESTMENT
}

fn default_fallback_price() -> f64 {
    DEFAULT_FALLBACK_PRICE
}

fn default_market_timezone() -> String {
    DEFAULT_MARKET_TIMEZONE.to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("io", "divest", "divest")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn quote_base_url(&self) -> &str {
        self.providers
            .quote
            .as_ref()
            .map_or(DEFAULT_QUOTE_URL, |p| &p.base_url)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.fallback_price > 0.0) {
            bail!("fallback_price must be positive, got {}", self.fallback_price);
        }
        if self.cache.open_ttl_minutes <= 0 || self.cache.closed_ttl_minutes <= 0 {
            bail!("cache windows must be positive");
        }
        // Dividends must be newest first with no repeated dates
        if let Some(pair) = self.dividends.windows(2).find(|w| w[0].date <= w[1].date) {
            bail!(
                "dividends must be ordered newest first: {} comes before {}",
                pair[0].date,
                pair[1].date
            );
        }
        if let Some(bad) = self
            .dividends
            .iter()
            .find(|d| !(d.amount.is_finite() && d.amount > 0.0))
        {
            bail!(
                "dividend on {} must have a positive amount, got {}",
                bad.date,
                bad.amount
            );
        }
        Ok(())
    }
}
