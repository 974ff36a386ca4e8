//! Display formatting for monetary amounts.

use crate::core::currency::SupportedCurrency;
use anyhow::{Result, bail};
use tracing::debug;

/// Formats `amount` with two fraction digits and thousands separators,
/// prefixed with the currency symbol (or the code for currencies without a
/// known symbol). Codes that are not well-formed ISO 4217 codes are formatted
/// as USD instead.
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    match try_format_currency(amount, currency_code) {
        Ok(formatted) => formatted,
        Err(e) => {
            debug!(error = %e, "Formatting as USD instead");
            format_with_prefix(amount, SupportedCurrency::Usd.symbol())
        }
    }
}

pub fn try_format_currency(amount: f64, currency_code: &str) -> Result<String> {
    if let Ok(currency) = currency_code.parse::<SupportedCurrency>() {
        return Ok(format_with_prefix(amount, currency.symbol()));
    }

    if !is_well_formed_code(currency_code) {
        bail!("Invalid currency code: {:?}", currency_code);
    }

    let prefix = format!("{} ", currency_code.to_uppercase());
    Ok(format_with_prefix(amount, &prefix))
}

// Three ASCII letters, as in ISO 4217. Case is not significant.
fn is_well_formed_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn format_with_prefix(amount: f64, prefix: &str) -> String {
    if amount.is_nan() {
        return format!("{prefix}NaN");
    }
    let sign = if amount.is_sign_negative() && amount != 0.0 {
        "-"
    } else {
        ""
    };
    if amount.is_infinite() {
        return format!("{sign}{prefix}∞");
    }

    let fixed = format!("{:.2}", amount.abs());
    // A value like -0.001 keeps its sign after rounding to zero.
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{prefix}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_currencies_use_symbols() {
        assert_eq!(format_currency(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_currency(0.5, "EUR"), "€0.50");
        assert_eq!(format_currency(79.0, "GBP"), "£79.00");
        assert_eq!(format_currency(1_000_000.0, "CRC"), "₡1,000,000.00");
    }

    #[test]
    fn test_unsupported_iso_code_uses_code_prefix() {
        assert_eq!(format_currency(1234.5, "CHF"), "CHF 1,234.50");
        assert_eq!(format_currency(12.0, "jpy"), "JPY 12.00");
        assert_eq!(format_currency(1.0, "usd"), "$1.00");
    }

    #[test]
    fn test_malformed_code_formats_as_usd() {
        assert_eq!(format_currency(42.0, "DOLLARS"), "$42.00");
        assert_eq!(format_currency(42.0, ""), "$42.00");
        assert_eq!(format_currency(42.0, "U$D"), "$42.00");
        assert!(try_format_currency(42.0, "U$D").is_err());
    }

    #[test]
    fn test_negative_and_rounding() {
        assert_eq!(format_currency(-1234.567, "USD"), "-$1,234.57");
        assert_eq!(format_currency(-0.001, "USD"), "-$0.00");
        assert_eq!(format_currency(-0.0, "USD"), "$0.00");
        assert_eq!(format_currency(0.005, "EUR"), "€0.01");
        assert_eq!(format_currency(999.999, "USD"), "$1,000.00");
    }

    #[test]
    fn test_non_finite_amounts() {
        assert_eq!(format_currency(f64::NAN, "USD"), "$NaN");
        assert_eq!(format_currency(f64::INFINITY, "GBP"), "£∞");
        assert_eq!(format_currency(f64::NEG_INFINITY, "USD"), "-$∞");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
