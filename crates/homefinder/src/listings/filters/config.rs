use serde::{Deserialize, Deserializer, Serialize};

use super::input::{self, NumericInput};
use crate::listings::domain::{PriceKind, PropertyKind};

/// Upper price bound meaning "no ceiling". Never echoed back as a real price.
pub const SENTINEL_MAX_PRICE: u64 = 999_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceKindFilter {
    #[default]
    All,
    Sale,
    Lease,
}

impl PriceKindFilter {
    pub fn admits(self, kind: PriceKind) -> bool {
        match self {
            Self::All => true,
            Self::Sale => kind == PriceKind::Sale,
            Self::Lease => kind == PriceKind::Lease,
        }
    }
}

impl From<PriceKind> for PriceKindFilter {
    fn from(kind: PriceKind) -> Self {
        match kind {
            PriceKind::Sale => Self::Sale,
            PriceKind::Lease => Self::Lease,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Price,
    #[default]
    Date,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// User-selected constraints and sort preference applied to a listing collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfiguration {
    pub price_kind: PriceKindFilter,
    pub min_price: u64,
    pub max_price: u64,
    pub bedrooms: u8,
    pub bathrooms: u8,
    /// `None` admits every property kind.
    pub property_kind: Option<PropertyKind>,
    pub location: String,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self {
            price_kind: PriceKindFilter::All,
            min_price: 0,
            max_price: SENTINEL_MAX_PRICE,
            bedrooms: 0,
            bathrooms: 0,
            property_kind: None,
            location: String::new(),
            sort_by: SortKey::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

impl FilterConfiguration {
    /// Overwrites every field present in `patch`; absent fields keep their value.
    pub fn apply_patch(&mut self, patch: &FilterPatch) {
        if let Some(price_kind) = patch.price_kind {
            self.price_kind = price_kind;
        }
        if let Some(min_price) = patch.min_price {
            self.min_price = min_price;
        }
        if let Some(max_price) = patch.max_price {
            self.max_price = max_price;
        }
        if let Some(bedrooms) = patch.bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = patch.bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(property_kind) = patch.property_kind {
            self.property_kind = property_kind;
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
    }

    pub fn patched(mut self, patch: &FilterPatch) -> Self {
        self.apply_patch(patch);
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Value for an editable min-price field; blank when unconstrained.
    pub fn min_price_display(&self) -> Option<u64> {
        (self.min_price > 0).then_some(self.min_price)
    }

    /// Value for an editable max-price field; the sentinel is shown as blank.
    pub fn max_price_display(&self) -> Option<u64> {
        (self.max_price != SENTINEL_MAX_PRICE && self.max_price > 0).then_some(self.max_price)
    }
}

/// Partial update for a [`FilterConfiguration`].
///
/// Numeric fields accept numbers or raw strings from form controls and are coerced to
/// safe defaults instead of failing. `property_kind: ""` (or `null`) clears the kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_kind: Option<PriceKindFilter>,
    #[serde(
        default,
        deserialize_with = "deserialize_min_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_price: Option<u64>,
    #[serde(
        default,
        deserialize_with = "deserialize_max_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_price: Option<u64>,
    #[serde(
        default,
        deserialize_with = "deserialize_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub bedrooms: Option<u8>,
    #[serde(
        default,
        deserialize_with = "deserialize_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub bathrooms: Option<u8>,
    #[serde(
        default,
        deserialize_with = "deserialize_property_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub property_kind: Option<Option<PropertyKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn location(query: impl Into<String>) -> Self {
        Self {
            location: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn sort(sort_by: SortKey, sort_order: SortOrder) -> Self {
        Self {
            sort_by: Some(sort_by),
            sort_order: Some(sort_order),
            ..Self::default()
        }
    }
}

fn deserialize_min_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumericInput>::deserialize(deserializer)?;
    Ok(Some(raw.map_or(0, |value| input::coerce_min_price(&value))))
}

fn deserialize_max_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumericInput>::deserialize(deserializer)?;
    Ok(Some(raw.map_or(SENTINEL_MAX_PRICE, |value| {
        input::coerce_max_price(&value)
    })))
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumericInput>::deserialize(deserializer)?;
    Ok(Some(raw.map_or(0, |value| input::coerce_threshold(&value))))
}

fn deserialize_property_kind<'de, D>(
    deserializer: D,
) -> Result<Option<Option<PropertyKind>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let raw = raw.unwrap_or_default();
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok(Some(None));
    }

    PropertyKind::parse(trimmed).map(|kind| Some(Some(kind))).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "unknown property kind '{trimmed}' (expected house, condo, apartment, or townhouse)"
        ))
    })
}
