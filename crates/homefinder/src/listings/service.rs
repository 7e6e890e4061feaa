use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{Listing, ListingId};
use super::filters::{
    self, active_filters, results_count_label, results_heading, ActiveFilter,
    FilterConfiguration, FilterPatch,
};
use super::presentation::{gate_results, ResultPage};
use super::saved::{SavedListings, SavedListingsError};
use super::source::ListingCatalog;
use crate::session::{Session, SessionError, SessionToken, SessionUser};
use crate::storage::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("listing {0} not found")]
    NotFound(ListingId),
    #[error("sign in to {0}")]
    SignInRequired(&'static str),
    #[error("saved listings unavailable: {0}")]
    Saved(#[from] SavedListingsError),
    #[error("session unavailable: {0}")]
    Session(#[from] SessionError),
}

/// Everything a results view needs for one search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub heading: &'static str,
    pub count_label: String,
    pub filters: FilterConfiguration,
    pub active_filters: Vec<ActiveFilter>,
    pub shown: usize,
    #[serde(flatten)]
    pub page: ResultPage,
}

/// Result of a sign-in: the token to present on later requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedIn {
    pub token: SessionToken,
    pub user: SessionUser,
}

/// Service composing the catalog, filter engine, saved listings, and session.
pub struct ListingService<S> {
    catalog: ListingCatalog,
    saved: SavedListings<S>,
    session: Session<S>,
    guest_result_limit: usize,
}

impl<S> ListingService<S>
where
    S: KeyValueStore + 'static,
{
    pub fn new(catalog: ListingCatalog, store: Arc<S>, guest_result_limit: usize) -> Self {
        Self {
            catalog,
            saved: SavedListings::new(Arc::clone(&store)),
            session: Session::new(store),
            guest_result_limit,
        }
    }

    pub fn catalog(&self) -> &ListingCatalog {
        &self.catalog
    }

    /// Merges `patch` over the default configuration and runs it against the
    /// caller's catalog window, withholding results from guests past the limit.
    pub fn search(
        &self,
        patch: &FilterPatch,
        token: Option<&SessionToken>,
    ) -> Result<SearchOutcome, ListingServiceError> {
        let signed_in = self.session.is_signed_in(token)?;
        let config = FilterConfiguration::default().patched(patch);
        let results = filters::apply(self.catalog.window(signed_in), &config);
        let page = gate_results(results, signed_in, self.guest_result_limit);

        info!(
            signed_in,
            total_matches = page.total_matches,
            shown = page.shown(),
            "listing search"
        );

        Ok(SearchOutcome {
            heading: results_heading(config.price_kind),
            count_label: results_count_label(page.total_matches),
            active_filters: active_filters(&config),
            filters: config,
            shown: page.shown(),
            page,
        })
    }

    pub fn get(
        &self,
        id: &ListingId,
        token: Option<&SessionToken>,
    ) -> Result<Listing, ListingServiceError> {
        self.require_user(token, "view full listing details")?;
        self.lookup(id).cloned()
    }

    pub fn saved(&self, token: Option<&SessionToken>) -> Result<Vec<Listing>, ListingServiceError> {
        let user = self.require_user(token, "view saved listings")?;
        Ok(self.saved.all(user.id)?)
    }

    pub fn toggle_saved(
        &self,
        id: &ListingId,
        token: Option<&SessionToken>,
    ) -> Result<bool, ListingServiceError> {
        let user = self.require_user(token, "save listings")?;
        let listing = self.lookup(id)?;
        Ok(self.saved.toggle(user.id, listing)?)
    }

    pub fn clear_saved(&self, token: Option<&SessionToken>) -> Result<(), ListingServiceError> {
        let user = self.require_user(token, "manage saved listings")?;
        Ok(self.saved.clear_all(user.id)?)
    }

    pub fn current_user(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<Option<SessionUser>, ListingServiceError> {
        Ok(self.session.current_user(token)?)
    }

    pub fn sign_in(&self, user: SessionUser) -> Result<SignedIn, ListingServiceError> {
        let token = self.session.sign_in(&user)?;
        Ok(SignedIn { token, user })
    }

    /// Logging out without a token is a no-op.
    pub fn logout(&self, token: Option<&SessionToken>) -> Result<(), ListingServiceError> {
        if let Some(token) = token {
            self.session.logout(token)?;
        }
        Ok(())
    }

    fn lookup(&self, id: &ListingId) -> Result<&Listing, ListingServiceError> {
        self.catalog
            .find(id)
            .ok_or_else(|| ListingServiceError::NotFound(id.clone()))
    }

    fn require_user(
        &self,
        token: Option<&SessionToken>,
        action: &'static str,
    ) -> Result<SessionUser, ListingServiceError> {
        self.session
            .current_user(token)?
            .ok_or(ListingServiceError::SignInRequired(action))
    }
}
