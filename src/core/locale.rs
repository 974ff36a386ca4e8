//! Default currency selection from the user's locale.

use crate::core::currency::SupportedCurrency;

/// Extracts the region from a locale tag such as `es-CR` or `en_GB.UTF-8`.
/// Returns `US` when the tag is missing or has no region.
pub fn detect_country(locale_tag: Option<&str>) -> String {
    locale_tag
        .map(|tag| tag.split(['.', '@']).next().unwrap_or(tag))
        .and_then(|tag| tag.split(['-', '_']).nth(1))
        .filter(|region| !region.is_empty())
        .map(|region| region.to_uppercase())
        .unwrap_or_else(|| "US".to_string())
}

pub fn default_currency(country: &str) -> SupportedCurrency {
    match country {
        "CR" => SupportedCurrency::Crc,
        "US" => SupportedCurrency::Usd,
        "GB" => SupportedCurrency::Gbp,
        "ES" => SupportedCurrency::Eur,
        _ => SupportedCurrency::Usd,
    }
}

/// Reads the locale from `LC_ALL`, then `LANG`.
pub fn system_locale() -> Option<String> {
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_country() {
        assert_eq!(detect_country(Some("es-CR")), "CR");
        assert_eq!(detect_country(Some("en_GB.UTF-8")), "GB");
        assert_eq!(detect_country(Some("de_de@euro")), "DE");
        assert_eq!(detect_country(Some("fr")), "US");
        assert_eq!(detect_country(Some("C.UTF-8")), "US");
        assert_eq!(detect_country(Some("")), "US");
        assert_eq!(detect_country(None), "US");
    }

    #[test]
    fn test_default_currency() {
        assert_eq!(default_currency("CR"), SupportedCurrency::Crc);
        assert_eq!(default_currency("GB"), SupportedCurrency::Gbp);
        assert_eq!(default_currency("ES"), SupportedCurrency::Eur);
        assert_eq!(default_currency("US"), SupportedCurrency::Usd);
        assert_eq!(default_currency("FR"), SupportedCurrency::Usd);
    }
}
