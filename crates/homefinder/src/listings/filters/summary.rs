use serde::Serialize;

use super::config::{
    FilterConfiguration, FilterPatch, PriceKindFilter, SortKey, SortOrder, SENTINEL_MAX_PRICE,
};
use crate::listings::domain::format_cad;

/// A removable chip describing one active constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub label: String,
    /// Patch that lifts this constraint when applied.
    pub reset: FilterPatch,
}

pub fn active_filters(config: &FilterConfiguration) -> Vec<ActiveFilter> {
    let mut chips = Vec::new();

    match config.price_kind {
        PriceKindFilter::All => {}
        kind => chips.push(ActiveFilter {
            label: if kind == PriceKindFilter::Sale {
                "For Sale".to_string()
            } else {
                "For Lease".to_string()
            },
            reset: FilterPatch {
                price_kind: Some(PriceKindFilter::All),
                ..FilterPatch::default()
            },
        }),
    }

    if let Some(kind) = config.property_kind {
        chips.push(ActiveFilter {
            label: kind.label().to_string(),
            reset: FilterPatch {
                property_kind: Some(None),
                ..FilterPatch::default()
            },
        });
    }

    if config.bedrooms > 0 {
        chips.push(ActiveFilter {
            label: format!("{}+ Bedrooms", config.bedrooms),
            reset: FilterPatch {
                bedrooms: Some(0),
                ..FilterPatch::default()
            },
        });
    }

    if config.bathrooms > 0 {
        chips.push(ActiveFilter {
            label: format!("{}+ Bathrooms", config.bathrooms),
            reset: FilterPatch {
                bathrooms: Some(0),
                ..FilterPatch::default()
            },
        });
    }

    if let Some(label) = price_range_label(config) {
        chips.push(ActiveFilter {
            label,
            reset: FilterPatch {
                min_price: Some(0),
                max_price: Some(SENTINEL_MAX_PRICE),
                ..FilterPatch::default()
            },
        });
    }

    if !config.location.is_empty() {
        chips.push(ActiveFilter {
            label: format!("Near \"{}\"", config.location),
            reset: FilterPatch::location(""),
        });
    }

    chips
}

fn price_range_label(config: &FilterConfiguration) -> Option<String> {
    match (config.min_price_display(), config.max_price_display()) {
        (None, None) => None,
        (Some(min), None) => Some(format!("${}+", format_cad(min))),
        (None, Some(max)) => Some(format!("Up to ${}", format_cad(max))),
        (Some(min), Some(max)) => Some(format!("${} - ${}", format_cad(min), format_cad(max))),
    }
}

/// Sort choices offered to callers, addressable by `"<sort_by>-<sort_order>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub key: &'static str,
    pub label: &'static str,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

pub const SORT_OPTIONS: [SortOption; 4] = [
    SortOption {
        key: "price-asc",
        label: "Price: Low to High",
        sort_by: SortKey::Price,
        sort_order: SortOrder::Asc,
    },
    SortOption {
        key: "price-desc",
        label: "Price: High to Low",
        sort_by: SortKey::Price,
        sort_order: SortOrder::Desc,
    },
    SortOption {
        key: "date-desc",
        label: "Newest First",
        sort_by: SortKey::Date,
        sort_order: SortOrder::Desc,
    },
    SortOption {
        key: "size-desc",
        label: "Largest First",
        sort_by: SortKey::Size,
        sort_order: SortOrder::Desc,
    },
];

impl SortOption {
    pub fn find(key: &str) -> Option<Self> {
        SORT_OPTIONS
            .iter()
            .copied()
            .find(|option| option.key.eq_ignore_ascii_case(key.trim()))
    }

    pub fn patch(self) -> FilterPatch {
        FilterPatch::sort(self.sort_by, self.sort_order)
    }
}

pub fn results_heading(price_kind: PriceKindFilter) -> &'static str {
    match price_kind {
        PriceKindFilter::All => "All Properties",
        PriceKindFilter::Sale => "Properties for Sale",
        PriceKindFilter::Lease => "Properties for Lease",
    }
}

pub fn results_count_label(count: usize) -> String {
    if count == 1 {
        "1 property found".to_string()
    } else {
        format!("{count} properties found")
    }
}
