use std::cmp::Ordering;

use super::config::{FilterConfiguration, SortKey, SortOrder};
use crate::listings::domain::Listing;

/// Filters and orders `listings` according to `config`.
///
/// Pure and deterministic: the same inputs always produce the same output. Listings
/// whose sort projections tie keep their input order.
pub fn apply(listings: &[Listing], config: &FilterConfiguration) -> Vec<Listing> {
    let needle = location_needle(config);
    let mut matched: Vec<Listing> = listings
        .iter()
        .filter(|listing| admits(listing, config, needle.as_deref()))
        .cloned()
        .collect();

    sort_listings(&mut matched, config.sort_by, config.sort_order);
    matched
}

/// True when `listing` satisfies every constraint in `config`.
pub fn matches(listing: &Listing, config: &FilterConfiguration) -> bool {
    admits(listing, config, location_needle(config).as_deref())
}

/// Stable in-place sort by the projection `sort_by` selects.
pub fn sort_listings(listings: &mut [Listing], sort_by: SortKey, sort_order: SortOrder) {
    listings.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &Listing, b: &Listing, sort_by: SortKey) -> Ordering {
    match sort_by {
        SortKey::Price => a.price.cmp(&b.price),
        SortKey::Date => a.listing_date.cmp(&b.listing_date),
        SortKey::Size => a.sqft.cmp(&b.sqft),
    }
}

fn location_needle(config: &FilterConfiguration) -> Option<String> {
    (!config.location.is_empty()).then(|| config.location.to_lowercase())
}

fn admits(listing: &Listing, config: &FilterConfiguration, needle: Option<&str>) -> bool {
    if !config.price_kind.admits(listing.price_kind) {
        return false;
    }

    if listing.price < config.min_price || listing.price > config.max_price {
        return false;
    }

    if config.bedrooms > 0 && listing.bedrooms < config.bedrooms {
        return false;
    }

    if config.bathrooms > 0 && listing.bathrooms < config.bathrooms {
        return false;
    }

    if let Some(kind) = config.property_kind {
        if listing.property_kind != kind {
            return false;
        }
    }

    match needle {
        Some(needle) => [&listing.address, &listing.city, &listing.title]
            .iter()
            .any(|field| field.to_lowercase().contains(needle)),
        None => true,
    }
}
