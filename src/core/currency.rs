//! Currency metadata and conversion

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// Currency code to "units of this currency per one unit of the base currency".
pub type RateTable = HashMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupportedCurrency {
    Usd,
    Eur,
    Gbp,
    Crc,
}

impl SupportedCurrency {
    pub const ALL: [SupportedCurrency; 4] = [
        SupportedCurrency::Usd,
        SupportedCurrency::Eur,
        SupportedCurrency::Gbp,
        SupportedCurrency::Crc,
    ];

    pub fn code(&self) -> &'static str {
        self.info().code
    }

    pub fn symbol(&self) -> &'static str {
        self.info().symbol
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn info(&self) -> &'static CurrencyInfo {
        match self {
            SupportedCurrency::Usd => &SUPPORTED_CURRENCIES[0],
            SupportedCurrency::Eur => &SUPPORTED_CURRENCIES[1],
            SupportedCurrency::Gbp => &SUPPORTED_CURRENCIES[2],
            SupportedCurrency::Crc => &SUPPORTED_CURRENCIES[3],
        }
    }
}

impl Display for SupportedCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SupportedCurrency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(SupportedCurrency::Usd),
            "EUR" => Ok(SupportedCurrency::Eur),
            "GBP" => Ok(SupportedCurrency::Gbp),
            "CRC" => Ok(SupportedCurrency::Crc),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
}

/// Currencies offered for selection. The first entry is the lookup default.
pub const SUPPORTED_CURRENCIES: [CurrencyInfo; 4] = [
    CurrencyInfo {
        code: "USD",
        symbol: "$",
        label: "US Dollar",
    },
    CurrencyInfo {
        code: "EUR",
        symbol: "€",
        label: "Euro",
    },
    CurrencyInfo {
        code: "GBP",
        symbol: "£",
        label: "British Pound",
    },
    CurrencyInfo {
        code: "CRC",
        symbol: "₡",
        label: "Costa Rican Colón",
    },
];

/// Looks up display metadata for `code`, falling back to USD for unknown codes.
pub fn currency_info(code: &str) -> &'static CurrencyInfo {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|c| c.code == code)
        .unwrap_or(&SUPPORTED_CURRENCIES[0])
}

/// Static rates (USD based) used whenever a live table cannot be fetched.
pub fn fallback_rates() -> RateTable {
    HashMap::from([
        ("USD".to_string(), 1.0),
        ("EUR".to_string(), 0.92),
        ("GBP".to_string(), 0.79),
        ("CRC".to_string(), 520.25),
    ])
}

// Missing, zero and NaN rates all count as 1.
fn rate_or_one(rates: &RateTable, code: &str) -> f64 {
    match rates.get(code) {
        Some(rate) if !rate.is_nan() && *rate != 0.0 => *rate,
        _ => 1.0,
    }
}

/// Converts `amount` between two currencies using a table keyed against `base`.
///
/// Never fails: identical currencies and an empty table return `amount`
/// unchanged, and a rate missing from the table is taken as 1. No rounding
/// is applied.
pub fn convert(amount: f64, from: &str, to: &str, rates: &RateTable, base: &str) -> f64 {
    if from == to || rates.is_empty() {
        return amount;
    }

    if from == base {
        return amount * rate_or_one(rates, to);
    }

    if to == base {
        return amount / rate_or_one(rates, from);
    }

    let amount_in_base = amount / rate_or_one(rates, from);
    amount_in_base * rate_or_one(rates, to)
}
