use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::ListingsConfig;
use crate::listings::domain::{Coordinates, Listing, ListingId, PriceKind, PropertyKind};
use crate::listings::service::ListingService;
use crate::listings::source::{ListingCatalog, ListingSource, SeedListings};
use crate::session::SessionUser;
use crate::storage::MemoryStore;

pub(super) fn listing(id: &str, price_kind: PriceKind, price: u64) -> Listing {
    Listing {
        id: ListingId::new(id),
        title: format!("Listing {id}"),
        price,
        price_kind,
        address: format!("{id} Queen Street West"),
        city: "Toronto".to_string(),
        province: "ON".to_string(),
        bedrooms: 2,
        bathrooms: 1,
        sqft: 900,
        property_kind: PropertyKind::Condo,
        images: Vec::new(),
        description: String::new(),
        amenities: Vec::new(),
        listing_date: date(2024, 12, 1),
        featured: false,
        coordinates: Coordinates {
            lat: 43.65,
            lng: -79.38,
        },
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn seed() -> Vec<Listing> {
    SeedListings.load().expect("seed dataset parses")
}

pub(super) fn ids(listings: &[Listing]) -> Vec<&str> {
    listings.iter().map(|listing| listing.id.as_str()).collect()
}

pub(super) fn member() -> SessionUser {
    SessionUser {
        id: 42,
        name: "Jordan".to_string(),
        email: "jordan@example.com".to_string(),
    }
}

pub(super) fn build_service() -> (ListingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let catalog = ListingCatalog::new(seed(), &ListingsConfig::default());
    let service = ListingService::new(catalog, store.clone(), 3);
    (service, store)
}
