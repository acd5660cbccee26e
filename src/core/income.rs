use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeriodicIncome {
    pub daily: f64,
    pub monthly: f64,
    pub quarterly: f64,
    pub annually: f64,
}

impl PeriodicIncome {
    pub fn periods(&self) -> [(&'static str, f64); 4] {
        [
            ("Daily", self.daily),
            ("Monthly", self.monthly),
            ("Quarterly", self.quarterly),
            ("Annually", self.annually),
        ]
    }
}

/// Splits the annual dividend income of `investment` at `yield_percent` into
/// flat periods. Nothing is reinvested. Non-positive (or NaN) inputs give
/// zero income.
pub fn project(investment: f64, yield_percent: f64) -> PeriodicIncome {
    if !(investment > 0.0) || !(yield_percent > 0.0) {
        return PeriodicIncome::default();
    }

    let annually = investment * yield_percent / 100.0;
    PeriodicIncome {
        daily: annually / 365.0,
        monthly: annually / 12.0,
        quarterly: annually / 4.0,
        annually,
    }
}

/// Whole and fractional shares `investment` buys at `price`.
pub fn shares_for(investment: f64, price: f64) -> f64 {
    if !(investment > 0.0) || !(price > 0.0) {
        return 0.0;
    }
    investment / price
}
