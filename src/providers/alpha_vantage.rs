use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::config::AlphaVantageProviderConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockSymbol {
    #[serde(rename = "1. symbol")]
    pub symbol: String,
    #[serde(rename = "2. name")]
    pub name: String,
    #[serde(rename = "3. type")]
    pub kind: String,
    #[serde(rename = "4. region")]
    pub region: String,
    #[serde(rename = "8. currency")]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub latest_trading_day: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<StockSymbol>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<HashMap<String, String>>,
}

/// Stock symbol search and latest quotes from the Alpha Vantage `query` API.
pub struct AlphaVantageProvider {
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        AlphaVantageProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &AlphaVantageProviderConfig) -> Self {
        Self::new(&config.base_url, &config.api_key)
    }

    async fn query<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, &str)]) -> Result<T> {
        let mut all_params = params.to_vec();
        all_params.push(("apikey", self.api_key.as_str()));
        let url = reqwest::Url::parse_with_params(&format!("{}/query", self.base_url), &all_params)
            .with_context(|| format!("Invalid Alpha Vantage base URL: {}", self.base_url))?;
        debug!("Requesting {}", url.path());

        let client = reqwest::Client::builder().user_agent("stockgift/1.0").build()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
    }

    /// Searches symbols matching `keywords`. An empty query returns no
    /// matches without calling the API.
    #[instrument(name = "SymbolSearch", skip(self))]
    pub async fn search_symbols(&self, keywords: &str) -> Result<Vec<StockSymbol>> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let data: SearchResponse = self
            .query(&[("function", "SYMBOL_SEARCH"), ("keywords", keywords)])
            .await
            .with_context(|| format!("Symbol search failed for: {keywords}"))?;
        debug!("Found {} matches", data.best_matches.len());
        Ok(data.best_matches)
    }

    /// Fetches the latest quote. Unknown symbols yield `None`.
    #[instrument(name = "QuoteFetch", skip(self))]
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Option<StockQuote>> {
        let data: QuoteResponse = self
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await
            .with_context(|| format!("Quote request failed for: {symbol}"))?;

        match data.global_quote {
            Some(fields) if !fields.is_empty() => parse_quote(&fields).map(Some),
            _ => Ok(None),
        }
    }
}

fn parse_quote(fields: &HashMap<String, String>) -> Result<StockQuote> {
    let field = |name: &str| {
        fields
            .get(name)
            .map(|v| v.trim())
            .ok_or_else(|| anyhow!("Missing quote field: {}", name))
    };
    let number = |name: &str| -> Result<f64> {
        let value = field(name)?;
        value
            .trim_end_matches('%')
            .parse::<f64>()
            .with_context(|| format!("Invalid number {value:?} in quote field: {name}"))
    };

    Ok(StockQuote {
        symbol: field("01. symbol")?.to_string(),
        price: number("05. price")?,
        change: number("09. change")?,
        change_percent: number("10. change percent")?,
        volume: field("06. volume")?
            .parse()
            .context("Invalid volume in quote")?,
        latest_trading_day: field("07. latest trading day")?.to_string(),
    })
}
