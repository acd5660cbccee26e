//! Application state and the snapshot derived from it.
//!
//! State only changes through [`AppState::apply`]; everything shown to the
//! user is recomputed from the state by [`AppState::estimate`].

use crate::core::dividend::{self, DividendPayment, YieldMethod};
use crate::core::income::{self, PeriodicIncome};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Nothing loaded yet.
    Pending,
    Cache,
    Live,
    Fallback,
    Manual,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PriceSource::Pending => "pending",
                PriceSource::Cache => "cached",
                PriceSource::Live => "live",
                PriceSource::Fallback => "fallback",
                PriceSource::Manual => "manual",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    FetchStarted,
    CacheHit(f64),
    FetchSucceeded(f64),
    FetchFailed(String),
    PriceEdited(f64),
    InvestmentEdited(f64),
    MethodSelected(YieldMethod),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub share_price: f64,
    pub source: PriceSource,
    pub loading: bool,
    pub fetch_error: Option<String>,
    pub investment: f64,
    pub method: YieldMethod,
    fallback_price: f64,
}

impl AppState {
    /// Starts with the fallback price so that derived values are never built
    /// from an empty price.
    pub fn new(investment: f64, method: YieldMethod, fallback_price: f64) -> Self {
        Self {
            share_price: fallback_price,
            source: PriceSource::Pending,
            loading: false,
            fetch_error: None,
            investment,
            method,
            fallback_price,
        }
    }

    pub fn apply(mut self, transition: Transition) -> Self {
        match transition {
            Transition::FetchStarted => {
                self.loading = true;
                self.fetch_error = None;
            }
            Transition::CacheHit(price) => {
                self.share_price = price;
                self.source = PriceSource::Cache;
                self.loading = false;
                self.fetch_error = None;
            }
            Transition::FetchSucceeded(price) => {
                self.share_price = price;
                self.source = PriceSource::Live;
                self.loading = false;
                self.fetch_error = None;
            }
            Transition::FetchFailed(reason) => {
                self.share_price = self.fallback_price;
                self.source = PriceSource::Fallback;
                self.loading = false;
                self.fetch_error = Some(reason);
            }
            Transition::PriceEdited(price) => {
                self.share_price = price;
                self.source = PriceSource::Manual;
            }
            Transition::InvestmentEdited(investment) => self.investment = investment,
            Transition::MethodSelected(method) => self.method = method,
        }
        self
    }

    pub fn estimate(&self, history: &[DividendPayment], as_of: NaiveDate) -> Estimate {
        let yield_percent =
            dividend::compute_yield(self.share_price, self.method, history, as_of);
        Estimate {
            share_price: self.share_price,
            source: self.source,
            loading: self.loading,
            fetch_error: self.fetch_error.clone(),
            investment: self.investment,
            method: self.method,
            annual_dividend: dividend::annualized_dividend(self.method, history, as_of),
            yield_percent,
            income: income::project(self.investment, yield_percent),
            shares: income::shares_for(self.investment, self.share_price),
            growth_percent: dividend::growth_rate(history, as_of),
        }
    }
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub share_price: f64,
    pub source: PriceSource,
    pub loading: bool,
    pub fetch_error: Option<String>,
    pub investment: f64,
    pub method: YieldMethod,
    pub annual_dividend: f64,
    pub yield_percent: f64,
    pub income: PeriodicIncome,
    pub shares: f64,
    pub growth_percent: Option<f64>,
}
