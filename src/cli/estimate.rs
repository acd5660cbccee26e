use super::ui;
use crate::core::{Estimate, PriceSource};
use comfy_table::Cell;

impl Estimate {
    pub fn display_as_table(&self, symbol: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Period"), ui::header_cell("Income")]);
        for (label, value) in self.income.periods() {
            table.add_row(vec![Cell::new(label), ui::money_cell(value)]);
        }

        let mut output = format!(
            "{} at {} {}\n",
            ui::style_text(symbol, ui::StyleType::Title),
            ui::money(self.share_price),
            ui::style_text(&format!("({})", self.source), ui::StyleType::Subtle),
        );

        if let Some(notice) = self.fetch_notice() {
            output.push_str(&format!("{}\n", ui::style_text(&notice, ui::StyleType::Error)));
        }

        output.push_str(&format!(
            "\nInvestment: {} ({:.2} shares)\n",
            ui::money(self.investment),
            self.shares
        ));
        output.push_str(&format!(
            "{} yield: {} ({} per share per year)\n\n",
            self.method,
            ui::style_text(
                &format!("{:.2}%", self.yield_percent),
                ui::StyleType::TotalValue
            ),
            ui::money(self.annual_dividend)
        ));

        output.push_str(&table.to_string());

        let growth = self
            .growth_percent
            .map_or("N/A".to_string(), |g| format!("{g:.2}%"));
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text("1Y dividend growth:", ui::StyleType::TotalLabel),
            growth
        ));

        output
    }

    /// The non-blocking notice shown when the live price was unavailable.
    pub fn fetch_notice(&self) -> Option<String> {
        if self.source != PriceSource::Fallback {
            return None;
        }
        let reason = self.fetch_error.as_deref().unwrap_or("unknown error");
        Some(format!(
            "Could not fetch live price ({reason}). Using default price {}.",
            ui::money(self.share_price)
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::dividend::tests::{as_of, sample_history};
    use crate::core::{AppState, Transition, YieldMethod};

    #[test]
    fn test_display_lists_all_periods() {
        let estimate = AppState::new(10_000.0, YieldMethod::Forward, 27.50)
            .apply(Transition::FetchSucceeded(78.50))
            .estimate(&sample_history(), as_of());
        let output = console::strip_ansi_codes(&estimate.display_as_table("SCHD")).to_string();

        assert!(output.contains("SCHD at $78.50 (live)"));
        assert!(output.contains("Forward yield: 1.32%"));
        for period in ["Daily", "Monthly", "Quarterly", "Annually"] {
            assert!(output.contains(period), "missing {period}");
        }
        assert!(output.contains("$132.48"));
        assert!(output.contains("$33.12"));
        assert!(output.contains("$11.04"));
        assert!(!output.contains("Could not fetch live price"));
    }

    #[test]
    fn test_display_shows_fallback_notice() {
        let estimate = AppState::new(10_000.0, YieldMethod::Forward, 27.50)
            .apply(Transition::FetchStarted)
            .apply(Transition::FetchFailed("HTTP error: 500".to_string()))
            .estimate(&sample_history(), as_of());
        let output = console::strip_ansi_codes(&estimate.display_as_table("SCHD")).to_string();

        assert!(output.contains("(fallback)"));
        assert!(output.contains(
            "Could not fetch live price (HTTP error: 500). Using default price $27.50."
        ));
    }

    #[test]
    fn test_growth_not_available() {
        let history: Vec<_> = sample_history().into_iter().take(7).collect();
        let estimate = AppState::new(10_000.0, YieldMethod::Forward, 27.50)
            .estimate(&history, as_of());
        let output = console::strip_ansi_codes(&estimate.display_as_table("SCHD")).to_string();
        assert!(output.contains("1Y dividend growth: N/A"));
    }
}
