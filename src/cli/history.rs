use super::ui;
use crate::core::dividend::{self, DividendPayment};
use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment, Color};

const BAR_WIDTH: usize = 30;

pub fn payments_table(history: &[DividendPayment], as_of: NaiveDate) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Amount"),
        ui::header_cell("Change"),
        ui::header_cell("Status"),
    ]);

    for (index, payment) in history.iter().enumerate() {
        let status = if payment.date > as_of {
            Cell::new("declared").fg(Color::Yellow)
        } else {
            Cell::new("paid").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(payment.date.format("%Y-%m-%d")),
            Cell::new(format!("${:.4}", payment.amount)).set_alignment(CellAlignment::Right),
            ui::change_cell(dividend::change_from_previous(history, index)),
            status,
        ]);
    }

    table.to_string()
}

pub fn annual_totals_table(history: &[DividendPayment], as_of: NaiveDate) -> String {
    let totals = dividend::annual_totals(history, as_of);
    let max = totals.values().copied().fold(0.0, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("Paid per share"),
        ui::header_cell(""),
    ]);
    for (year, total) in totals.iter().rev() {
        table.add_row(vec![
            Cell::new(year),
            ui::money_cell(*total),
            Cell::new(ui::bar(*total, max, BAR_WIDTH)).fg(Color::Green),
        ]);
    }
    table.to_string()
}

pub fn run(symbol: &str, history: &[DividendPayment], as_of: NaiveDate) {
    let title = format!("{symbol} dividend history");
    println!("{}\n", ui::style_text(&title, ui::StyleType::Title));

    if history.is_empty() {
        println!(
            "{}",
            ui::style_text("No dividends configured", ui::StyleType::Subtle)
        );
        return;
    }

    println!("{}", payments_table(history, as_of));

    let growth = dividend::growth_rate(history, as_of);
    let growth_text = growth.map_or("N/A".to_string(), |g| format!("{g:.2}%"));
    let growth_style = if growth.is_some() {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };
    println!(
        "\n{} {}",
        ui::style_text("1Y dividend growth:", ui::StyleType::TotalLabel),
        ui::style_text(&growth_text, growth_style)
    );

    ui::print_separator();
    println!("{}", annual_totals_table(history, as_of));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dividend::tests::{as_of, sample_history};
    use chrono::Duration;

    #[test]
    fn test_payments_table_marks_declared() {
        let mut history = sample_history();
        history.insert(
            0,
            DividendPayment {
                date: as_of() + Duration::days(20),
                amount: 0.28,
            },
        );
        let output = console::strip_ansi_codes(&payments_table(&history, as_of())).to_string();

        assert!(output.contains("declared"));
        assert!(output.contains("paid"));
        assert!(output.contains("$0.2800"));
        assert!(output.contains("+7.69%"));
        assert!(output.contains("2025-07-14"));
    }

    #[test]
    fn test_annual_totals_table() {
        let output =
            console::strip_ansi_codes(&annual_totals_table(&sample_history(), as_of())).to_string();
        assert!(output.contains("2025"));
        assert!(output.contains("2021"));
    }
}
