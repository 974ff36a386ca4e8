pub mod alpha_vantage;
pub mod exchange_rate_api;
pub mod util;

pub use alpha_vantage::{AlphaVantageProvider, StockQuote, StockSymbol};
pub use exchange_rate_api::ExchangeRateApiSource;
