use std::fs;
use std::sync::Arc;
use tracing::info;

use stockgift::core::{RateProvenance, RateProvider, currency};
use stockgift::providers::ExchangeRateApiSource;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const USD_RATES: &str = r#"{
        "base": "USD",
        "date": "2024-03-01",
        "rates": { "USD": 1, "EUR": 0.5, "GBP": 0.8, "CRC": 500.0 }
    }"#;

    pub async fn create_rates_mock_server(base: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/latest/{base}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub async fn create_alpha_vantage_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "SYMBOL_SEARCH"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"bestMatches": [{
                    "1. symbol": "IBM",
                    "2. name": "International Business Machines Corp",
                    "3. type": "Equity",
                    "4. region": "United States",
                    "8. currency": "USD"
                }]}"#,
            ))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "GLOBAL_QUOTE"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Global Quote": {}}"#))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub fn write_config(rates_uri: &str, alpha_uri: &str, currency: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            currency: "{currency}"
            providers:
              exchange_rates:
                base_url: {rates_uri}
                retries: 0
                retry_delay_ms: 0
              alpha_vantage:
                base_url: {alpha_uri}
                api_key: "test"
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_repeated_lookups_hit_the_network_once() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(test_utils::USD_RATES))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = RateProvider::new(ExchangeRateApiSource::new(&mock_server.uri()));
    let first = provider.get_rates_with_provenance("USD").await;
    let second = provider.get_rates_with_provenance("USD").await;
    info!(first = ?first.provenance, second = ?second.provenance, "Fetched rates twice");

    assert_eq!(first.provenance, RateProvenance::Fresh);
    assert_eq!(second.provenance, RateProvenance::Cached);
    assert!(Arc::ptr_eq(&first.table, &second.table));
    assert!((second.convert(50.0, "EUR", "GBP") - 80.0).abs() < 1e-9);
}

#[test_log::test(tokio::test)]
async fn test_unreachable_source_falls_back() {
    let mock_server = test_utils::create_rates_mock_server("EUR", 503, "").await;
    let source = ExchangeRateApiSource::new(&mock_server.uri()).with_retries(1, 1);
    let provider = RateProvider::new(source);

    let rates = provider.get_rates_with_provenance("EUR").await;
    assert_eq!(rates.provenance, RateProvenance::Fallback);
    assert_eq!(*rates.table, currency::fallback_rates());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);

    // Nothing was cached, so the next call tries again.
    provider.get_rates("EUR").await;
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 4);
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let rates_server = test_utils::create_rates_mock_server("USD", 200, test_utils::USD_RATES).await;
    let alpha_server = test_utils::create_alpha_vantage_mock_server().await;
    let config_file = test_utils::write_config(&rates_server.uri(), &alpha_server.uri(), "USD");
    let config_path = config_file.path().to_str();

    let commands = vec![
        stockgift::AppCommand::Currencies,
        stockgift::AppCommand::Rates { base: None },
        stockgift::AppCommand::Convert {
            amount: 100.0,
            from: "usd".to_string(),
            to: "eur".to_string(),
            base: None,
        },
        stockgift::AppCommand::Search {
            query: "ibm".to_string(),
        },
        stockgift::AppCommand::Quote {
            symbol: "NOPE".to_string(),
        },
        stockgift::AppCommand::Track(stockgift::cli::track::TrackArgs {
            symbol: "IBM".to_string(),
            shares: 3.0,
            purchase_price: 150.0,
            purchase_date: chrono::Utc::now().date_naive() - chrono::Duration::days(60),
            range: stockgift::core::TimeRange::OneMonth,
            seed: Some(11),
        }),
    ];

    for command in commands {
        let result = stockgift::run_command(command, config_path).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
    assert!(!rates_server.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_app_flow_survives_rate_outage() {
    let rates_server = test_utils::create_rates_mock_server("GBP", 500, "").await;
    let alpha_server = test_utils::create_alpha_vantage_mock_server().await;
    let config_file = test_utils::write_config(&rates_server.uri(), &alpha_server.uri(), "GBP");

    let result = stockgift::run_command(
        stockgift::AppCommand::Convert {
            amount: 10.0,
            from: "GBP".to_string(),
            to: "CRC".to_string(),
            base: None,
        },
        config_file.path().to_str(),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
    assert_eq!(rates_server.received_requests().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("absent.yaml");

    let result =
        stockgift::run_command(stockgift::AppCommand::Currencies, missing.to_str()).await;
    assert!(result.is_err());
}

#[test]
fn test_setup_writes_loadable_config() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.yaml");

    stockgift::cli::setup::setup_at_path(&path).expect("setup failed");
    let content = fs::read_to_string(&path).expect("config not written");
    assert!(content.contains("exchange_rates"));

    let config = stockgift::core::config::AppConfig::load_from_path(&path).expect("invalid config");
    assert_eq!(config.currency.as_deref(), Some("USD"));
}

#[test_log::test(tokio::test)]
async fn test_out_of_range_cache_ttl_is_an_error() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "cache_ttl_secs: 100000000000000000\n")
        .expect("Failed to write config file");

    let result =
        stockgift::run_command(stockgift::AppCommand::Currencies, config_file.path().to_str())
            .await;
    let err = result.expect_err("an unrepresentable TTL should be rejected");
    assert!(err.to_string().contains("cache_ttl_secs is out of range"));
}
