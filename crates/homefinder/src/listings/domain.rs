use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceKind {
    Sale,
    Lease,
}

impl PriceKind {
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Sale => "For Sale",
            Self::Lease => "For Rent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    House,
    Condo,
    Apartment,
    Townhouse,
}

impl PropertyKind {
    pub const fn ordered() -> [Self; 4] {
        [Self::House, Self::Condo, Self::Apartment, Self::Townhouse]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Condo => "condo",
            Self::Apartment => "apartment",
            Self::Townhouse => "townhouse",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Condo => "Condo",
            Self::Apartment => "Apartment",
            Self::Townhouse => "Townhouse",
        }
    }

    /// Case-insensitive lookup by key; unknown kinds yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A property available for sale or lease. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    /// Whole CAD; monthly rent for leases.
    pub price: u64,
    #[serde(alias = "priceType")]
    pub price_kind: PriceKind,
    pub address: String,
    pub city: String,
    pub province: String,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub sqft: u32,
    #[serde(alias = "propertyType")]
    pub property_kind: PropertyKind,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(alias = "listingDate", deserialize_with = "deserialize_listing_date")]
    pub listing_date: NaiveDate,
    #[serde(default)]
    pub featured: bool,
    pub coordinates: Coordinates,
}

impl Listing {
    pub fn price_label(&self) -> String {
        let amount = format_cad(self.price);
        match self.price_kind {
            PriceKind::Sale => format!("${amount} CAD"),
            PriceKind::Lease => format!("${amount} CAD/mo"),
        }
    }

    pub fn price_per_sqft(&self) -> Option<u64> {
        if self.sqft == 0 {
            return None;
        }
        Some((self.price as f64 / f64::from(self.sqft)).round() as u64)
    }

    pub fn full_address(&self) -> String {
        format!("{}, {}, {}", self.address, self.city, self.province)
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the date.
pub fn parse_listing_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

fn deserialize_listing_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_listing_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unreadable listing date '{raw}'")))
}

/// Groups thousands with commas: `1285000` -> `1,285,000`.
pub fn format_cad(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_cad(0), "0");
        assert_eq!(format_cad(950), "950");
        assert_eq!(format_cad(4200), "4,200");
        assert_eq!(format_cad(1_285_000), "1,285,000");
    }

    #[test]
    fn listing_dates_accept_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 15);
        assert_eq!(parse_listing_date("2024-12-15"), expected);
        assert_eq!(parse_listing_date("2024-12-15T09:30:00Z"), expected);
        assert_eq!(parse_listing_date("15/12/2024"), None);
    }

    #[test]
    fn property_kind_parse_ignores_case() {
        assert_eq!(PropertyKind::parse(" Condo "), Some(PropertyKind::Condo));
        assert_eq!(PropertyKind::parse("loft"), None);
        assert_eq!(PropertyKind::parse(""), None);
    }
}
