//! Dividend history, yield and growth calculations.
//!
//! The history is always ordered newest-first. Entries dated after `as_of`
//! are declared but not yet paid.

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Payments per year.
pub const PAYMENTS_PER_YEAR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendPayment {
    pub date: NaiveDate,
    /// Amount per share.
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldMethod {
    #[default]
    Forward,
    #[serde(alias = "ttm")]
    TrailingTwelveMonths,
}

impl Display for YieldMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                YieldMethod::Forward => "Forward",
                YieldMethod::TrailingTwelveMonths => "TTM",
            }
        )
    }
}

impl FromStr for YieldMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" | "fwd" => Ok(YieldMethod::Forward),
            "ttm" | "trailing" | "trailing_twelve_months" => Ok(YieldMethod::TrailingTwelveMonths),
            _ => Err(anyhow!("Invalid yield method: {}", s)),
        }
    }
}

/// Payments already made on or before `as_of`, newest first.
pub fn past_dividends(
    history: &[DividendPayment],
    as_of: NaiveDate,
) -> impl Iterator<Item = &DividendPayment> {
    history.iter().filter(move |d| d.date <= as_of)
}

/// Annual per-share dividend implied by `method`, or 0 when there is not
/// enough history.
pub fn annualized_dividend(
    method: YieldMethod,
    history: &[DividendPayment],
    as_of: NaiveDate,
) -> f64 {
    match method {
        // The latest declared rate, paid or not
        YieldMethod::Forward => history
            .first()
            .map_or(0.0, |d| d.amount * PAYMENTS_PER_YEAR as f64),
        YieldMethod::TrailingTwelveMonths => {
            let recent: Vec<f64> = past_dividends(history, as_of)
                .take(PAYMENTS_PER_YEAR)
                .map(|d| d.amount)
                .collect();
            if recent.len() < PAYMENTS_PER_YEAR {
                0.0
            } else {
                recent.iter().sum()
            }
        }
    }
}

/// Annual yield in percent of `price`.
pub fn compute_yield(
    price: f64,
    method: YieldMethod,
    history: &[DividendPayment],
    as_of: NaiveDate,
) -> f64 {
    let annual = annualized_dividend(method, history, as_of);
    if !(price > 0.0) || !(annual.is_finite() && annual > 0.0) {
        return 0.0;
    }
    annual / price * 100.0
}

/// One-year dividend growth in percent: the last four paid dividends against
/// the four before them. `None` when fewer than eight have been paid or the
/// earlier year paid nothing.
pub fn growth_rate(history: &[DividendPayment], as_of: NaiveDate) -> Option<f64> {
    let past: Vec<f64> = past_dividends(history, as_of)
        .take(PAYMENTS_PER_YEAR * 2)
        .map(|d| d.amount)
        .collect();
    if past.len() < PAYMENTS_PER_YEAR * 2 {
        return None;
    }

    let (recent, prior) = past.split_at(PAYMENTS_PER_YEAR);
    let recent_sum: f64 = recent.iter().sum();
    let prior_sum: f64 = prior.iter().sum();
    if prior_sum == 0.0 {
        return None;
    }
    Some((recent_sum - prior_sum) / prior_sum * 100.0)
}

/// Total paid per share in each calendar year.
pub fn annual_totals(history: &[DividendPayment], as_of: NaiveDate) -> BTreeMap<i32, f64> {
    let mut totals = BTreeMap::new();
    for payment in past_dividends(history, as_of) {
        *totals.entry(payment.date.year()).or_insert(0.0) += payment.amount;
    }
    totals
}

/// Change against the next older payment, in percent.
pub fn change_from_previous(history: &[DividendPayment], index: usize) -> Option<f64> {
    let current = history.get(index)?;
    let previous = history.get(index + 1)?;
    if previous.amount == 0.0 {
        return None;
    }
    Some((current.amount - previous.amount) / previous.amount * 100.0)
}
