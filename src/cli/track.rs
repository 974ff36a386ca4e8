//! Tracks the simulated value of a stock gift in the display currency.

use super::ui;
use crate::core::price::{filter_by_range, simulate_history, y_axis_domain};
use crate::core::{PriceSummary, RateProvenance, Rates, StockData, TimeRange, format_currency};
use chrono::{DateTime, NaiveDate, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Prices are simulated in this currency and converted for display.
const QUOTE_CURRENCY: &str = "USD";

/// At most this many rows of the price series are printed.
const MAX_ROWS: usize = 15;

#[derive(Debug, Clone)]
pub struct TrackArgs {
    pub symbol: String,
    pub shares: f64,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    pub range: TimeRange,
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub struct TrackReport {
    pub symbol: String,
    pub shares: f64,
    pub currency: String,
    pub range: TimeRange,
    pub purchase_price: f64,
    pub summary: PriceSummary,
    pub total_value: f64,
    pub series: Vec<StockData>,
    pub provenance: RateProvenance,
}

pub fn build_report(
    args: &TrackArgs,
    rates: &Rates,
    currency: &str,
    now: DateTime<Utc>,
) -> TrackReport {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let history = simulate_history(
        args.purchase_price,
        args.purchase_date,
        now.date_naive(),
        &mut rng,
    );

    let converted: Vec<StockData> = history
        .into_iter()
        .map(|point| StockData {
            price: rates.convert(point.price, QUOTE_CURRENCY, currency),
            ..point
        })
        .collect();
    let purchase_price = rates.convert(args.purchase_price, QUOTE_CURRENCY, currency);
    let summary = PriceSummary::from_series(&converted, purchase_price);

    TrackReport {
        symbol: args.symbol.to_uppercase(),
        shares: args.shares,
        currency: currency.to_string(),
        range: args.range,
        purchase_price,
        total_value: summary.current_price * args.shares,
        summary,
        series: filter_by_range(&converted, args.range, now),
        provenance: rates.provenance,
    }
}

// Evenly spaced rows, always keeping the latest point.
fn sample_rows(series: &[StockData], max_rows: usize) -> Vec<&StockData> {
    if series.len() <= max_rows || max_rows < 2 {
        return series.iter().collect();
    }
    let step = (series.len() - 1) as f64 / (max_rows - 1) as f64;
    (0..max_rows)
        .map(|i| &series[((i as f64 * step).round() as usize).min(series.len() - 1)])
        .collect()
}

impl TrackReport {
    pub fn display(&self) -> String {
        let currency = &self.currency;
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell(&format!("Price ({currency})")),
            ui::header_cell("vs purchase"),
        ]);
        for point in sample_rows(&self.series, MAX_ROWS) {
            let change = if self.purchase_price != 0.0 {
                (point.price - self.purchase_price) / self.purchase_price * 100.0
            } else {
                0.0
            };
            table.add_row(vec![
                comfy_table::Cell::new(point.date.format("%Y-%m-%d")),
                ui::right_cell(format_currency(point.price, currency)),
                ui::change_cell(change),
            ]);
        }

        let mut output = format!(
            "{} x {} ({}, {})\n\n",
            ui::style_text(&self.symbol, ui::StyleType::Title),
            self.shares,
            self.range,
            ui::provenance_label(self.provenance)
        );

        if self.series.is_empty() {
            output.push_str("No price data in the selected range\n");
        } else {
            output.push_str(&table.to_string());
            output.push('\n');
        }

        if let Some((low, high)) = y_axis_domain(&self.series) {
            output.push_str(&ui::style_text(
                &format!(
                    "Chart scale: {} to {}\n",
                    format_currency(low, currency),
                    format_currency(high, currency)
                ),
                ui::StyleType::Subtle,
            ));
        }

        let sign = if self.summary.price_change >= 0.0 { "+" } else { "" };
        output.push_str(&format!(
            "\nPurchase price: {}\nCurrent price: {}\nChange: {}{} ({}{:.2}%)\n",
            format_currency(self.purchase_price, currency),
            format_currency(self.summary.current_price, currency),
            sign,
            format_currency(self.summary.price_change, currency),
            sign,
            self.summary.price_change_percent,
        ));
        output.push_str(&format!(
            "Total Value ({}): {}",
            ui::style_text(currency, ui::StyleType::TotalLabel),
            ui::style_text(
                &format_currency(self.total_value, currency),
                ui::StyleType::TotalValue
            )
        ));
        output
    }
}
