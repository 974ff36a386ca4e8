pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::track::TrackArgs;
use crate::core::config::AppConfig;
use crate::core::{RateProvider, SupportedCurrency, locale};
use crate::providers::{AlphaVantageProvider, ExchangeRateApiSource};
use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Rates {
        base: Option<String>,
    },
    Convert {
        amount: f64,
        from: String,
        to: String,
        base: Option<String>,
    },
    Search {
        query: String,
    },
    Quote {
        symbol: String,
    },
    Track(TrackArgs),
}

/// The configured display currency, or the locale's default.
pub fn display_currency(config: &AppConfig, locale_tag: Option<&str>) -> String {
    match &config.currency {
        Some(code) => code.trim().to_uppercase(),
        None => {
            let country = locale::detect_country(locale_tag);
            let currency = locale::default_currency(&country);
            debug!("Detected country {}, using {}", country, currency);
            currency.code().to_string()
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("stockgift starting...");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    let currency = display_currency(&config, locale::system_locale().as_deref());
    if currency.parse::<SupportedCurrency>().is_err() {
        debug!("Display currency {} is not one of the supported set", currency);
    }

    let rate_source = ExchangeRateApiSource::from_config(&config.providers.exchange_rates);
    let rate_provider = RateProvider::new(rate_source).with_ttl(config.cache_ttl()?);
    let stock_provider = AlphaVantageProvider::from_config(&config.providers.alpha_vantage);

    match command {
        AppCommand::Currencies => {
            println!("{}", cli::rates::render_currencies(&currency));
            Ok(())
        }
        AppCommand::Rates { base } => {
            let base = base.map_or(currency, |b| b.to_uppercase());
            cli::rates::run_rates(&rate_provider, &base).await
        }
        AppCommand::Convert {
            amount,
            from,
            to,
            base,
        } => {
            let base = base.map_or(currency, |b| b.to_uppercase());
            cli::rates::run_convert(
                &rate_provider,
                amount,
                &from.to_uppercase(),
                &to.to_uppercase(),
                &base,
            )
            .await
        }
        AppCommand::Search { query } => cli::stocks::run_search(&stock_provider, &query).await,
        AppCommand::Quote { symbol } => cli::stocks::run_quote(&stock_provider, &symbol).await,
        AppCommand::Track(args) => {
            let rates = cli::rates::fetch_rates(&rate_provider, &currency).await;
            let report = cli::track::build_report(&args, &rates, &currency, Utc::now());
            println!("{}", report.display());
            Ok(())
        }
    }
}
