//! Core business logic: currencies, exchange rates and price series

pub mod clock;
pub mod config;
pub mod currency;
pub mod format;
pub mod locale;
pub mod log;
pub mod price;
pub mod rates;

// Re-export main types for cleaner imports
pub use clock::{Clock, SystemClock};
pub use currency::{CurrencyInfo, RateTable, SupportedCurrency, convert, currency_info};
pub use format::format_currency;
pub use price::{PriceSummary, StockData, TimeRange};
pub use rates::{RateProvenance, RateProvider, RateSource, Rates};
