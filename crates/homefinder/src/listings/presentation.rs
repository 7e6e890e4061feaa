use serde::Serialize;

use super::domain::Listing;

pub const FEATURED_LIMIT: usize = 6;

/// The slice of filtered results a caller is allowed to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    pub total_matches: usize,
    pub listings: Vec<Listing>,
    /// Set when results were withheld because the caller is not signed in.
    pub truncated: bool,
}

impl ResultPage {
    pub fn shown(&self) -> usize {
        self.listings.len()
    }
}

/// Guests see at most `guest_limit` results; signed-in callers see everything.
pub fn gate_results(results: Vec<Listing>, signed_in: bool, guest_limit: usize) -> ResultPage {
    let total_matches = results.len();
    let mut listings = results;
    if !signed_in {
        listings.truncate(guest_limit);
    }

    ResultPage {
        total_matches,
        truncated: listings.len() < total_matches,
        listings,
    }
}

/// Featured listings in result order.
pub fn featured(results: &[Listing]) -> Vec<&Listing> {
    results
        .iter()
        .filter(|listing| listing.featured)
        .take(FEATURED_LIMIT)
        .collect()
}
