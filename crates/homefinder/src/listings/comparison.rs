use serde::Serialize;

use super::domain::{Listing, ListingId};

pub const COMPARISON_CAPACITY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    #[error("comparison already holds {COMPARISON_CAPACITY} listings")]
    Full,
}

/// Side-by-side comparison of up to three listings.
#[derive(Debug, Clone, Default)]
pub struct ComparisonTray {
    selected: Vec<Listing>,
}

impl ComparisonTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding a listing that is already selected is a no-op.
    pub fn add(&mut self, listing: &Listing) -> Result<(), ComparisonError> {
        if self.contains(&listing.id) {
            return Ok(());
        }
        if self.selected.len() >= COMPARISON_CAPACITY {
            return Err(ComparisonError::Full);
        }
        self.selected.push(listing.clone());
        Ok(())
    }

    pub fn remove(&mut self, id: &ListingId) {
        self.selected.retain(|listing| &listing.id != id);
    }

    pub fn contains(&self, id: &ListingId) -> bool {
        self.selected.iter().any(|listing| &listing.id == id)
    }

    pub fn selected(&self) -> &[Listing] {
        &self.selected
    }

    pub fn is_full(&self) -> bool {
        self.selected.len() >= COMPARISON_CAPACITY
    }

    /// Candidates not yet selected, in the order given, capped at `limit`.
    pub fn candidates<'a>(&self, available: &'a [Listing], limit: usize) -> Vec<&'a Listing> {
        available
            .iter()
            .filter(|listing| !self.contains(&listing.id))
            .take(limit)
            .collect()
    }

    pub fn rows(&self) -> Vec<ComparisonRow> {
        self.selected.iter().map(ComparisonRow::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub id: ListingId,
    pub title: String,
    pub price: String,
    pub property_kind: &'static str,
    pub city: String,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub sqft: u32,
    pub price_per_sqft: Option<u64>,
}

impl From<&Listing> for ComparisonRow {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            price: listing.price_label(),
            property_kind: listing.property_kind.label(),
            city: listing.city.clone(),
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            sqft: listing.sqft,
            price_per_sqft: listing.price_per_sqft(),
        }
    }
}
