use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use super::domain::{
    parse_listing_date, Coordinates, Listing, ListingId, PriceKind, PropertyKind,
};
use crate::config::ListingsConfig;

const SEED_LISTINGS: &str = include_str!("../../data/listings.json");

/// Supplies the listing collection the filter engine works over.
pub trait ListingSource: Send + Sync {
    fn load(&self) -> Result<Vec<Listing>, ListingSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ListingSourceError {
    #[error("failed to read listings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid listing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid listing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("listing {id} has an unreadable listing date '{value}'")]
    InvalidDate { id: String, value: String },
    #[error("listing id {0} appears more than once")]
    DuplicateId(ListingId),
}

/// The built-in GTA dataset shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedListings;

impl ListingSource for SeedListings {
    fn load(&self) -> Result<Vec<Listing>, ListingSourceError> {
        let listings: Vec<Listing> = serde_json::from_str(SEED_LISTINGS)?;
        validate(listings)
    }
}

/// A JSON array of listing objects, as exported by a listings collection endpoint.
#[derive(Debug, Clone)]
pub struct JsonFileListings {
    path: PathBuf,
}

impl JsonFileListings {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Listing>, ListingSourceError> {
        let listings: Vec<Listing> = serde_json::from_reader(reader)?;
        validate(listings)
    }
}

impl ListingSource for JsonFileListings {
    fn load(&self) -> Result<Vec<Listing>, ListingSourceError> {
        let file = open(&self.path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }
}

/// Flat spreadsheet export; `images` and `amenities` are `|`-separated.
#[derive(Debug, Clone)]
pub struct CsvListings {
    path: PathBuf,
}

impl CsvListings {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Listing>, ListingSourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();

        for record in csv_reader.deserialize::<ListingRow>() {
            listings.push(record?.into_listing()?);
        }

        validate(listings)
    }
}

impl ListingSource for CsvListings {
    fn load(&self) -> Result<Vec<Listing>, ListingSourceError> {
        let file = open(&self.path)?;
        Self::from_reader(file)
    }
}

/// Picks the source for a configured path by extension: `.csv` or JSON otherwise.
pub fn source_for_path(path: &Path) -> Box<dyn ListingSource> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Box::new(CsvListings::new(path))
    } else {
        Box::new(JsonFileListings::new(path))
    }
}

fn open(path: &Path) -> Result<File, ListingSourceError> {
    File::open(path).map_err(|source| ListingSourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(listings: Vec<Listing>) -> Result<Vec<Listing>, ListingSourceError> {
    let mut seen = HashSet::with_capacity(listings.len());
    for listing in &listings {
        if !seen.insert(&listing.id) {
            return Err(ListingSourceError::DuplicateId(listing.id.clone()));
        }
    }
    Ok(listings)
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    title: String,
    price: u64,
    price_kind: PriceKind,
    address: String,
    city: String,
    province: String,
    bedrooms: u8,
    bathrooms: u8,
    sqft: u32,
    property_kind: PropertyKind,
    #[serde(default)]
    images: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    amenities: String,
    listing_date: String,
    #[serde(default, deserialize_with = "flag")]
    featured: bool,
    lat: f64,
    lng: f64,
}

impl ListingRow {
    fn into_listing(self) -> Result<Listing, ListingSourceError> {
        let listing_date =
            parse_listing_date(&self.listing_date).ok_or_else(|| ListingSourceError::InvalidDate {
                id: self.id.clone(),
                value: self.listing_date.clone(),
            })?;

        Ok(Listing {
            id: ListingId(self.id),
            title: self.title,
            price: self.price,
            price_kind: self.price_kind,
            address: self.address,
            city: self.city,
            province: self.province,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            sqft: self.sqft,
            property_kind: self.property_kind,
            images: split_list(&self.images),
            description: self.description,
            amenities: split_list(&self.amenities),
            listing_date,
            featured: self.featured,
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "expected a yes/no flag, found '{other}'"
        ))),
    }
}

/// Loaded listings plus the browsing windows granted to guests and members.
#[derive(Debug, Clone)]
pub struct ListingCatalog {
    listings: Arc<[Listing]>,
    guest_fetch_limit: usize,
    member_fetch_limit: usize,
}

impl ListingCatalog {
    pub fn new(listings: Vec<Listing>, config: &ListingsConfig) -> Self {
        Self {
            listings: listings.into(),
            guest_fetch_limit: config.guest_fetch_limit,
            member_fetch_limit: config.member_fetch_limit,
        }
    }

    /// The configured file is authoritative; the seed dataset is used only when none is set.
    pub fn load(config: &ListingsConfig) -> Result<Self, ListingSourceError> {
        let listings = match &config.source_path {
            Some(path) => {
                let listings = source_for_path(path).load()?;
                info!(path = %path.display(), count = listings.len(), "loaded listings from file");
                listings
            }
            None => {
                let listings = SeedListings.load()?;
                debug!(count = listings.len(), "loaded seed listings");
                listings
            }
        };
        Ok(Self::new(listings, config))
    }

    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    /// The prefix of the catalog a caller may browse.
    pub fn window(&self, signed_in: bool) -> &[Listing] {
        let limit = if signed_in {
            self.member_fetch_limit
        } else {
            self.guest_fetch_limit
        };
        &self.listings[..limit.min(self.listings.len())]
    }

    pub fn find(&self, id: &ListingId) -> Option<&Listing> {
        self.listings.iter().find(|listing| &listing.id == id)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn seed_dataset_loads() {
        let listings = SeedListings.load().expect("seed parses");
        assert_eq!(listings.len(), 8);
        assert!(listings.iter().any(|listing| listing.featured));
        assert_eq!(listings[1].price_kind, PriceKind::Lease);
    }

    #[test]
    fn accepts_camel_case_collection_exports() {
        let payload = r#"[{
            "id": "41", "title": "Leslieville Semi", "price": 1099000, "priceType": "sale",
            "address": "12 Logan Avenue", "city": "Toronto", "province": "ON",
            "bedrooms": 3, "bathrooms": 2, "sqft": 1600, "propertyType": "house",
            "listingDate": "2024-11-30", "coordinates": { "lat": 43.66, "lng": -79.34 }
        }]"#;
        let listings = JsonFileListings::from_reader(payload.as_bytes()).expect("parses");
        assert_eq!(listings[0].property_kind, PropertyKind::House);
        assert!(listings[0].images.is_empty());
        assert!(!listings[0].featured);
    }

    #[test]
    fn json_and_csv_accept_the_same_timestamp_dates() {
        let json = r#"[{
            "id": "9",
            "title": "Annex Duplex",
            "price": 1650000,
            "price_kind": "sale",
            "address": "21 Brunswick Avenue",
            "city": "Toronto",
            "province": "ON",
            "bedrooms": 4,
            "bathrooms": 2,
            "sqft": 2100,
            "property_kind": "house",
            "listing_date": "2024-12-15T09:30:00Z",
            "coordinates": { "lat": 43.66, "lng": -79.40 }
        }]"#;
        let csv = "id,title,price,price_kind,address,city,province,bedrooms,bathrooms,sqft,property_kind,listing_date,lat,lng\n\
9,Annex Duplex,1650000,sale,21 Brunswick Avenue,Toronto,ON,4,2,2100,house,2024-12-15T09:30:00Z,43.66,-79.40\n";

        let from_json = JsonFileListings::from_reader(json.as_bytes()).expect("json parses");
        let from_csv = CsvListings::from_reader(csv.as_bytes()).expect("csv parses");

        assert_eq!(
            from_json[0].listing_date,
            NaiveDate::from_ymd_opt(2024, 12, 15).expect("valid date")
        );
        assert_eq!(from_json[0].listing_date, from_csv[0].listing_date);
    }

    #[test]
    fn json_rejects_unreadable_dates() {
        let json = r#"[{
            "id": "9", "title": "t", "price": 1, "price_kind": "sale", "address": "a",
            "city": "c", "province": "ON", "bedrooms": 1, "bathrooms": 1, "sqft": 1,
            "property_kind": "house", "listing_date": "15/12/2024",
            "coordinates": { "lat": 0.0, "lng": 0.0 }
        }]"#;
        assert!(matches!(
            JsonFileListings::from_reader(json.as_bytes()),
            Err(ListingSourceError::Json(_))
        ));
    }

    #[test]
    fn window_caps_guest_browsing() {
        let listings = SeedListings.load().expect("seed parses");
        let config = ListingsConfig {
            guest_fetch_limit: 5,
            ..ListingsConfig::default()
        };
        let catalog = ListingCatalog::new(listings, &config);
        assert_eq!(catalog.window(false).len(), 5);
        assert_eq!(catalog.window(true).len(), 8);
    }
}
