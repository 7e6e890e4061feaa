use tracing::debug;

use super::domain::Listing;
use super::filters::{self, FilterConfiguration, FilterPatch, QuickSearch};

/// Single owner of the current filter configuration.
///
/// Updates go through [`FilterPatch`] merges; nothing else mutates the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    config: FilterConfiguration,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FilterConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfiguration {
        &self.config
    }

    pub fn update(&mut self, patch: &FilterPatch) -> &FilterConfiguration {
        self.config.apply_patch(patch);
        debug!(?patch, "filter configuration patched");
        &self.config
    }

    pub fn clear(&mut self) -> &FilterConfiguration {
        self.config = FilterConfiguration::default();
        &self.config
    }

    pub fn search(&mut self, query: impl Into<String>) -> &FilterConfiguration {
        self.update(&FilterPatch::location(query))
    }

    pub fn quick_search(&mut self, search: QuickSearch) -> &FilterConfiguration {
        self.update(&search.into_patch())
    }

    pub fn results(&self, listings: &[Listing]) -> Vec<Listing> {
        filters::apply(listings, &self.config)
    }
}
