use super::common::*;
use crate::listings::domain::{PriceKind, PropertyKind};
use crate::listings::filters::{
    apply, engine, FilterConfiguration, FilterPatch, PriceKindFilter, SortKey, SortOrder,
};
use crate::listings::FilterState;

fn configured(patch: FilterPatch) -> FilterConfiguration {
    FilterConfiguration::default().patched(&patch)
}

#[test]
fn default_configuration_returns_everything_newest_first() {
    let results = apply(&seed(), &FilterConfiguration::default());
    assert_eq!(ids(&results), vec!["8", "4", "2", "1", "5", "3", "6", "7"]);
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(apply(&[], &FilterConfiguration::default()).is_empty());
}

#[test]
fn price_kind_all_never_removes_on_kind() {
    let listings = seed();
    let config = configured(FilterPatch {
        bedrooms: Some(2),
        ..FilterPatch::default()
    });
    let all = apply(&listings, &config);

    let sale = apply(
        &listings,
        &config.clone().patched(&FilterPatch {
            price_kind: Some(PriceKindFilter::Sale),
            ..FilterPatch::default()
        }),
    );
    let lease = apply(
        &listings,
        &config.patched(&FilterPatch {
            price_kind: Some(PriceKindFilter::Lease),
            ..FilterPatch::default()
        }),
    );

    assert_eq!(all.len(), sale.len() + lease.len());
    assert!(sale.iter().all(|listing| listing.price_kind == PriceKind::Sale));
    assert!(lease.iter().all(|listing| listing.price_kind == PriceKind::Lease));
}

#[test]
fn price_bounds_are_inclusive_at_both_ends() {
    let config = configured(FilterPatch {
        min_price: Some(2_650),
        max_price: Some(4_200),
        ..FilterPatch::default()
    });
    let results = apply(&seed(), &config);
    assert_eq!(ids(&results), vec!["8", "4", "2"]);
    assert!(results
        .iter()
        .all(|listing| listing.price >= config.min_price && listing.price <= config.max_price));
}

#[test]
fn inverted_bounds_match_nothing() {
    let config = configured(FilterPatch {
        min_price: Some(5_000),
        max_price: Some(4_000),
        ..FilterPatch::default()
    });
    assert!(apply(&seed(), &config).is_empty());
}

#[test]
fn room_thresholds_are_minimums() {
    let bedrooms = apply(
        &seed(),
        &configured(FilterPatch {
            bedrooms: Some(4),
            ..FilterPatch::default()
        }),
    );
    assert_eq!(ids(&bedrooms), vec!["1", "5", "3", "7"]);

    let bathrooms = apply(
        &seed(),
        &configured(FilterPatch {
            bathrooms: Some(3),
            ..FilterPatch::default()
        }),
    );
    assert_eq!(ids(&bathrooms), vec!["1", "5", "3", "6", "7"]);
}

#[test]
fn property_kind_selects_exact_kind() {
    let results = apply(
        &seed(),
        &configured(FilterPatch {
            property_kind: Some(Some(PropertyKind::Condo)),
            ..FilterPatch::default()
        }),
    );
    assert_eq!(ids(&results), vec!["8", "2", "6"]);
}

#[test]
fn location_matches_address_city_or_title_ignoring_case() {
    let by_city = apply(&seed(), &configured(FilterPatch::location("TORONTO")));
    assert_eq!(ids(&by_city), vec!["4", "2", "3", "6"]);

    let by_address = apply(&seed(), &configured(FilterPatch::location("lakeshore")));
    assert_eq!(ids(&by_address), vec!["1", "7"]);

    let by_title = apply(&seed(), &configured(FilterPatch::location("Penthouse")));
    assert_eq!(ids(&by_title), vec!["6"]);
}

#[test]
fn unmatched_location_is_an_empty_result() {
    let results = apply(&seed(), &configured(FilterPatch::location("Scarborough")));
    assert!(results.is_empty());
}

#[test]
fn sorts_by_selected_projection() {
    let by_price = apply(
        &seed(),
        &configured(FilterPatch::sort(SortKey::Price, SortOrder::Asc)),
    );
    assert_eq!(ids(&by_price), vec!["4", "8", "2", "6", "5", "1", "3", "7"]);

    let by_size = apply(
        &seed(),
        &configured(FilterPatch::sort(SortKey::Size, SortOrder::Desc)),
    );
    assert_eq!(ids(&by_size), vec!["7", "5", "3", "6", "1", "2", "8", "4"]);

    let oldest_first = apply(
        &seed(),
        &configured(FilterPatch::sort(SortKey::Date, SortOrder::Asc)),
    );
    assert_eq!(ids(&oldest_first), vec!["7", "6", "3", "5", "1", "2", "4", "8"]);
}

#[test]
fn ties_keep_input_order_in_both_directions() {
    let mut first = listing("a", PriceKind::Lease, 3_000);
    first.listing_date = date(2024, 10, 1);
    let mut second = listing("b", PriceKind::Lease, 3_000);
    second.listing_date = date(2024, 11, 1);
    let third = listing("c", PriceKind::Lease, 3_000);
    let cheaper = listing("d", PriceKind::Lease, 2_000);
    let input = vec![first, second, third, cheaper];

    let desc = apply(
        &input,
        &configured(FilterPatch::sort(SortKey::Price, SortOrder::Desc)),
    );
    assert_eq!(ids(&desc), vec!["a", "b", "c", "d"]);

    let asc = apply(
        &input,
        &configured(FilterPatch::sort(SortKey::Price, SortOrder::Asc)),
    );
    assert_eq!(ids(&asc), vec!["d", "a", "b", "c"]);
}

#[test]
fn applying_twice_is_idempotent() {
    let config = configured(FilterPatch {
        price_kind: Some(PriceKindFilter::Sale),
        sort_by: Some(SortKey::Size),
        sort_order: Some(SortOrder::Asc),
        ..FilterPatch::default()
    });
    let once = apply(&seed(), &config);
    let twice = apply(&once, &config);
    assert_eq!(once, twice);
}

#[test]
fn matches_agrees_with_apply() {
    let listings = seed();
    let config = configured(FilterPatch {
        bedrooms: Some(3),
        location: Some("toronto".to_string()),
        ..FilterPatch::default()
    });
    let expected: Vec<&str> = listings
        .iter()
        .filter(|listing| engine::matches(listing, &config))
        .map(|listing| listing.id.as_str())
        .collect();
    let applied = apply(&listings, &config);
    let mut results = ids(&applied);
    results.sort_unstable();
    let mut expected = expected;
    expected.sort_unstable();
    assert_eq!(results, expected);
}

#[test]
fn malformed_form_input_never_filters_everything_out() {
    let patch: FilterPatch = serde_json::from_str(
        r#"{ "min_price": "lots", "max_price": "NaN", "bedrooms": "any", "bathrooms": "" }"#,
    )
    .expect("patch parses");

    let mut state = FilterState::new();
    state.update(&patch);
    assert!(state.config().is_default());
    assert_eq!(state.results(&seed()).len(), 8);
}
