//! Listing catalog, search, saved listings, and comparison.

pub mod comparison;
pub mod domain;
pub mod filters;
pub mod presentation;
pub mod router;
pub mod saved;
pub mod service;
pub mod source;
mod state;

#[cfg(test)]
mod tests;

pub use comparison::{ComparisonError, ComparisonRow, ComparisonTray};
pub use domain::{Coordinates, Listing, ListingId, PriceKind, PropertyKind};
pub use presentation::{featured, gate_results, ResultPage};
pub use router::{listing_router, SESSION_HEADER};
pub use saved::{SavedListings, SavedListingsError};
pub use service::{ListingService, ListingServiceError, SearchOutcome, SignedIn};
pub use source::{
    CsvListings, JsonFileListings, ListingCatalog, ListingSource, ListingSourceError,
    SeedListings,
};
pub use state::FilterState;
