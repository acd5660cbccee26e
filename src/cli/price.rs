use super::ui;
use crate::core::{CacheEntry, PriceSource};
use chrono::{DateTime, Utc};
use comfy_table::Cell;

/// What `divest price` reports about the current share price.
#[derive(Debug, Clone)]
pub struct PriceStatus {
    pub symbol: String,
    pub price: f64,
    pub source: PriceSource,
    pub fetch_error: Option<String>,
    pub market_open: bool,
    pub ttl_minutes: i64,
    pub cached: Option<CacheEntry>,
    pub now: DateTime<Utc>,
}

impl PriceStatus {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);

        table.add_row(vec![Cell::new("Price"), ui::money_cell(self.price)]);
        table.add_row(vec![Cell::new("Source"), Cell::new(self.source)]);
        table.add_row(vec![
            Cell::new("Market"),
            Cell::new(if self.market_open { "open" } else { "closed" }),
        ]);
        table.add_row(vec![
            Cell::new("Cache window"),
            Cell::new(format!("{} min", self.ttl_minutes)),
        ]);
        table.add_row(vec![
            Cell::new("Cache age"),
            ui::format_optional_cell(self.cached, |entry| {
                format!("{:.1} min", entry.age_minutes(self.now))
            }),
        ]);
        if let Some(error) = &self.fetch_error {
            table.add_row(vec![
                Cell::new("Error"),
                Cell::new(ui::style_text(error, ui::StyleType::Error)),
            ]);
        }

        format!(
            "{}\n\n{}",
            ui::style_text(&self.symbol, ui::StyleType::Title),
            table
        )
    }
}
