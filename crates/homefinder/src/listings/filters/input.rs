//! Coercion of raw form input into filter values.
//!
//! Form controls hand over strings (or loosely typed JSON numbers). Anything that does
//! not start with an integer falls back to the field's neutral value, so malformed input
//! never reaches the price comparisons.

use serde::Deserialize;

use super::config::{FilterPatch, PriceKindFilter, SENTINEL_MAX_PRICE};

/// A numeric field as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumericInput {
    /// Integer prefix of the input, truncating fractions. `None` when nothing parses.
    pub fn leading_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(raw) => parse_leading_integer(raw),
        }
    }
}

impl From<&str> for NumericInput {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Reads an optional sign followed by digits, stopping at the first non-digit.
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    seen_digit.then_some(if negative { -value } else { value })
}

/// Bedroom/bathroom minimum; 0 means unconstrained.
pub fn coerce_threshold(raw: &NumericInput) -> u8 {
    match raw.leading_integer() {
        Some(value) if value > 0 => u8::try_from(value).unwrap_or(u8::MAX),
        _ => 0,
    }
}

pub fn coerce_min_price(raw: &NumericInput) -> u64 {
    match raw.leading_integer() {
        Some(value) if value > 0 => value as u64,
        _ => 0,
    }
}

/// Zero, negative, or unparseable ceilings all mean "no ceiling".
pub fn coerce_max_price(raw: &NumericInput) -> u64 {
    match raw.leading_integer() {
        Some(value) if value > 0 => value as u64,
        _ => SENTINEL_MAX_PRICE,
    }
}

/// Splits a `"min-max"` range label such as `"$500,000-$1,000,000"` into bounds.
///
/// Each half keeps only its digits. A missing or empty half falls back to 0 / sentinel.
pub fn parse_price_range(raw: &str) -> (u64, u64) {
    let mut halves = raw.splitn(2, '-').map(digits_only);
    let min = halves.next().flatten().filter(|value| *value > 0).unwrap_or(0);
    let max = halves
        .next()
        .flatten()
        .filter(|value| *value > 0)
        .unwrap_or(SENTINEL_MAX_PRICE);
    (min, max)
}

fn digits_only(part: &str) -> Option<u64> {
    let digits: String = part.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// Quick search from the landing banner: tenure tab, location, bedrooms, price range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuickSearch {
    #[serde(default)]
    pub tenure: Option<PriceKindFilter>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bedrooms: String,
    #[serde(default)]
    pub price_range: String,
}

impl QuickSearch {
    /// Bounds are only touched when a price range was chosen.
    pub fn into_patch(self) -> FilterPatch {
        let bedrooms = if self.bedrooms.trim().is_empty() {
            0
        } else {
            coerce_threshold(&NumericInput::from(self.bedrooms.as_str()))
        };

        let (min_price, max_price) = if self.price_range.trim().is_empty() {
            (None, None)
        } else {
            let (min, max) = parse_price_range(&self.price_range);
            (Some(min), Some(max))
        };

        FilterPatch {
            price_kind: Some(self.tenure.unwrap_or(PriceKindFilter::Sale)),
            location: Some(self.location),
            bedrooms: Some(bedrooms),
            min_price,
            max_price,
            ..FilterPatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_integer_stops_at_first_non_digit() {
        assert_eq!(parse_leading_integer("42"), Some(42));
        assert_eq!(parse_leading_integer("  3+ beds"), Some(3));
        assert_eq!(parse_leading_integer("-7"), Some(-7));
        assert_eq!(parse_leading_integer("12.9"), Some(12));
        assert_eq!(parse_leading_integer("abc"), None);
        assert_eq!(parse_leading_integer(""), None);
        assert_eq!(parse_leading_integer("-"), None);
    }

    #[test]
    fn thresholds_fall_back_to_zero() {
        assert_eq!(coerce_threshold(&"abc".into()), 0);
        assert_eq!(coerce_threshold(&"-2".into()), 0);
        assert_eq!(coerce_threshold(&"4".into()), 4);
        assert_eq!(coerce_threshold(&NumericInput::Integer(900)), u8::MAX);
        assert_eq!(coerce_threshold(&NumericInput::Float(f64::NAN)), 0);
    }

    #[test]
    fn max_price_falls_back_to_sentinel() {
        assert_eq!(coerce_max_price(&"".into()), SENTINEL_MAX_PRICE);
        assert_eq!(coerce_max_price(&"0".into()), SENTINEL_MAX_PRICE);
        assert_eq!(coerce_max_price(&"NaN".into()), SENTINEL_MAX_PRICE);
        assert_eq!(coerce_max_price(&"750000".into()), 750_000);
        assert_eq!(coerce_min_price(&"NaN".into()), 0);
        assert_eq!(coerce_min_price(&NumericInput::Float(1250.75)), 1250);
    }

    #[test]
    fn price_range_labels_split_into_bounds() {
        assert_eq!(
            parse_price_range("$500,000-$1,000,000"),
            (500_000, 1_000_000)
        );
        assert_eq!(parse_price_range("$2,000,000+"), (2_000_000, SENTINEL_MAX_PRICE));
        assert_eq!(parse_price_range("-$3,000"), (0, 3_000));
        assert_eq!(parse_price_range("any"), (0, SENTINEL_MAX_PRICE));
    }

    #[test]
    fn quick_search_leaves_bounds_alone_without_range() {
        let patch = QuickSearch {
            tenure: Some(PriceKindFilter::Lease),
            location: "Toronto".to_string(),
            bedrooms: "2".to_string(),
            price_range: String::new(),
        }
        .into_patch();

        assert_eq!(patch.price_kind, Some(PriceKindFilter::Lease));
        assert_eq!(patch.location.as_deref(), Some("Toronto"));
        assert_eq!(patch.bedrooms, Some(2));
        assert_eq!(patch.min_price, None);
        assert_eq!(patch.max_price, None);
    }
}
