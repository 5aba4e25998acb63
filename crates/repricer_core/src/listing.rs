use std::fmt;

use thiserror::Error;
use url::Url;

/// Written to the price cell when the page has no price container.
pub const PRICE_NOT_FOUND: &str = "price not found";
/// Written to the quantity cell when the page has no availability container.
pub const QUANTITY_BELOW_THRESHOLD: &str = "<10";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("not a url: {0}")]
    Malformed(String),
    #[error("url has no scheme or host: {0}")]
    MissingHost(String),
}

/// A listing page address that passed validation.
///
/// Keeps the raw text as read from the table so row matching compares
/// exactly what the operator typed, not a re-serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingUrl(String);

impl ListingUrl {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let parsed =
            Url::parse(raw).map_err(|err| ValidationError::Malformed(format!("{raw} ({err})")))?;
        let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
        if parsed.scheme().is_empty() || !has_host {
            return Err(ValidationError::MissingHost(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedListing {
    pub price: String,
    pub quantity: String,
}

impl ScrapedListing {
    /// Builds a listing from the raw texts found on the page. Sentinels stand
    /// in only for texts that were absent; present text is normalized even
    /// when nothing survives.
    pub fn from_raw(raw_price: Option<&str>, raw_quantity: Option<&str>) -> Self {
        Self {
            price: raw_price.map_or_else(|| PRICE_NOT_FOUND.to_string(), normalize_price),
            quantity: raw_quantity.map_or_else(
                || QUANTITY_BELOW_THRESHOLD.to_string(),
                normalize_quantity,
            ),
        }
    }
}

/// Keeps digits and the decimal point, then swaps the point for a comma.
///
/// `"US $1,234.56"` becomes `"1234,56"`; `"Free"` becomes `""`.
pub fn normalize_price(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .map(|c| if c == '.' { ',' } else { c })
        .collect()
}

/// Keeps digits only; `"Last one"` becomes `""`.
pub fn normalize_quantity(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_drops_currency_and_grouping() {
        assert_eq!(normalize_price("US $1,234.56"), "1234,56");
        assert_eq!(normalize_price("EUR 19.99/ea"), "19,99");
        assert_eq!(normalize_price("42"), "42");
    }

    #[test]
    fn price_without_digits_is_stripped_not_replaced() {
        assert_eq!(normalize_price("Free"), "");
        assert_eq!(normalize_price("."), ",");
    }

    #[test]
    fn quantity_keeps_digits_only() {
        assert_eq!(normalize_quantity("More than 10 available"), "10");
        assert_eq!(normalize_quantity(" 3 available "), "3");
        assert_eq!(normalize_quantity("Last one"), "");
    }

    #[test]
    fn url_needs_scheme_and_host() {
        assert!(ListingUrl::parse("https://www.ebay.com/itm/1").is_ok());
        assert!(matches!(
            ListingUrl::parse("not-a-url"),
            Err(ValidationError::Malformed(_))
        ));
        assert!(ListingUrl::parse("").is_err());
        assert!(matches!(
            ListingUrl::parse("mailto:someone@example.com"),
            Err(ValidationError::MissingHost(_))
        ));
    }

    #[test]
    fn url_keeps_raw_text() {
        let url = ListingUrl::parse("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com");
    }
}
