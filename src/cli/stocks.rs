use super::ui;
use crate::core::format_currency;
use crate::providers::{AlphaVantageProvider, StockQuote, StockSymbol};
use anyhow::Result;
use comfy_table::Cell;
use tracing::error;

pub fn render_matches(query: &str, matches: &[StockSymbol]) -> String {
    if matches.is_empty() {
        return format!("No symbols found for {query:?}");
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Type"),
        ui::header_cell("Region"),
        ui::header_cell("Currency"),
    ]);
    for m in matches {
        table.add_row(vec![
            Cell::new(&m.symbol),
            Cell::new(&m.name),
            Cell::new(&m.kind),
            Cell::new(&m.region),
            Cell::new(&m.currency),
        ]);
    }
    table.to_string()
}

pub fn render_quote(symbol: &str, quote: Option<&StockQuote>) -> String {
    let Some(quote) = quote else {
        return format!("No quote available for {symbol}");
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Change (%)"),
        ui::header_cell("Volume"),
        ui::header_cell("Trading day"),
    ]);
    table.add_row(vec![
        ui::right_cell(format_currency(quote.price, "USD")),
        ui::right_cell(format_currency(quote.change, "USD")),
        ui::change_cell(quote.change_percent),
        ui::right_cell(quote.volume.to_string()),
        Cell::new(&quote.latest_trading_day),
    ]);
    format!(
        "Quote: {}\n\n{}",
        ui::style_text(&quote.symbol, ui::StyleType::Title),
        table
    )
}

/// Lookup failures are logged and shown as an empty result.
pub async fn run_search(provider: &AlphaVantageProvider, query: &str) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Searching for {query}"));
    let matches = provider.search_symbols(query).await.unwrap_or_else(|e| {
        error!(error = ?e, "Symbol search failed");
        Vec::new()
    });
    spinner.finish_and_clear();
    println!("{}", render_matches(query, &matches));
    Ok(())
}

pub async fn run_quote(provider: &AlphaVantageProvider, symbol: &str) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching quote for {symbol}"));
    let quote = provider.fetch_quote(symbol).await.unwrap_or_else(|e| {
        error!(error = ?e, "Quote request failed");
        None
    });
    spinner.finish_and_clear();
    println!("{}", render_quote(symbol, quote.as_ref()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_matches() {
        assert_eq!(render_matches("zzz", &[]), "No symbols found for \"zzz\"");
    }

    #[test]
    fn test_render_quote() {
        console::set_colors_enabled(false);
        let quote = StockQuote {
            symbol: "IBM".to_string(),
            price: 1169.12,
            change: -0.62,
            change_percent: -0.368,
            volume: 3_071_891,
            latest_trading_day: "2024-03-01".to_string(),
        };
        let output = render_quote("IBM", Some(&quote));
        assert!(output.contains("$1,169.12"));
        assert!(output.contains("-$0.62"));
        assert!(output.contains("-0.37%"));
        assert!(output.contains("3071891"));

        assert_eq!(render_quote("NOPE", None), "No quote available for NOPE");
    }
}
