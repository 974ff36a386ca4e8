use super::ui;
use crate::core::currency::SUPPORTED_CURRENCIES;
use crate::core::{Clock, RateProvider, RateSource, Rates, format_currency};
use anyhow::Result;
use comfy_table::Cell;
use std::collections::BTreeMap;

pub fn render_currencies(selected: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Symbol"),
        ui::header_cell("Currency"),
    ]);
    for info in &SUPPORTED_CURRENCIES {
        let code = if info.code == selected {
            format!("{} *", info.code)
        } else {
            info.code.to_string()
        };
        table.add_row(vec![
            Cell::new(code),
            Cell::new(info.symbol),
            Cell::new(info.label),
        ]);
    }
    format!(
        "{}\n{}",
        table,
        ui::style_text("* display currency", ui::StyleType::Subtle)
    )
}

pub fn render_rates(rates: &Rates) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {}", rates.base)),
    ]);

    let sorted: BTreeMap<_, _> = rates.table.iter().collect();
    for (code, rate) in sorted {
        table.add_row(vec![Cell::new(code), ui::right_cell(format!("{rate:.4}"))]);
    }

    let as_of = rates
        .fetched_at
        .map(|t| format!(", as of {}", t.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    format!(
        "Exchange rates for {} ({}{})\n\n{}",
        ui::style_text(&rates.base, ui::StyleType::Title),
        ui::provenance_label(rates.provenance),
        as_of,
        table
    )
}

pub fn render_conversion(rates: &Rates, amount: f64, from: &str, to: &str) -> String {
    let converted = rates.convert(amount, from, to);
    format!(
        "{} = {}\n{}",
        format_currency(amount, from),
        ui::style_text(&format_currency(converted, to), ui::StyleType::TotalValue),
        ui::provenance_label(rates.provenance)
    )
}

pub async fn fetch_rates<S: RateSource, C: Clock>(
    provider: &RateProvider<S, C>,
    base: &str,
) -> Rates {
    let spinner = ui::new_spinner(&format!("Fetching exchange rates for {base}"));
    let rates = provider.get_rates_with_provenance(base).await;
    spinner.finish_and_clear();
    rates
}

pub async fn run_rates<S: RateSource, C: Clock>(
    provider: &RateProvider<S, C>,
    base: &str,
) -> Result<()> {
    let rates = fetch_rates(provider, base).await;
    println!("{}", render_rates(&rates));
    Ok(())
}

pub async fn run_convert<S: RateSource, C: Clock>(
    provider: &RateProvider<S, C>,
    amount: f64,
    from: &str,
    to: &str,
    base: &str,
) -> Result<()> {
    let rates = fetch_rates(provider, base).await;
    println!("{}", render_conversion(&rates, amount, from, to));
    Ok(())
}
