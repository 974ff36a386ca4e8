use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::ExchangeRatesProviderConfig;
use crate::core::currency::RateTable;
use crate::core::rates::RateSource;
use crate::providers::util::with_retry;

/// Fetches rate tables from an exchangerate-api.com compatible endpoint
/// (`GET {base_url}/v4/latest/{BASE}`).
pub struct ExchangeRateApiSource {
    base_url: String,
    retries: usize,
    retry_delay_ms: u64,
    timeout: Duration,
}

impl ExchangeRateApiSource {
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&ExchangeRatesProviderConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &ExchangeRatesProviderConfig) -> Self {
        ExchangeRateApiSource {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_retries(mut self, retries: usize, retry_delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    rates: RateTable,
    base: String,
    date: String,
}

fn validate_rates(base: &str, data: ExchangeRateResponse) -> Result<RateTable> {
    if data.rates.is_empty() {
        bail!("Empty rate table for base currency: {}", base);
    }
    if let Some((code, rate)) = data
        .rates
        .iter()
        .find(|(_, rate)| !rate.is_finite() || **rate < 0.0)
    {
        bail!("Invalid rate {} for {} in table for {}", rate, code, base);
    }
    if !data.base.eq_ignore_ascii_case(base) {
        debug!(
            "Rate table for {} reports base {} (as of {})",
            base, data.base, data.date
        );
    }
    Ok(data.rates)
}

#[async_trait]
impl RateSource for ExchangeRateApiSource {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("stockgift/1.0")
            .timeout(self.timeout)
            .build()?;

        let response = with_retry(
            || async {
                client
                    .get(&url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
            },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Failed to fetch exchange rates for base currency: {base}"))?;

        let text = response.text().await?;
        let data: ExchangeRateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        debug!(date = %data.date, "Received {} rates for {}", data.rates.len(), base);
        validate_rates(base, data)
    }
}
