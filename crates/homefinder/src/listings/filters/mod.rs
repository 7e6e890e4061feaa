//! Client-side filtering and ordering of listing collections.

mod config;
pub mod engine;
pub mod input;
mod summary;

pub use config::{
    FilterConfiguration, FilterPatch, PriceKindFilter, SortKey, SortOrder, SENTINEL_MAX_PRICE,
};
pub use engine::apply;
pub use input::{NumericInput, QuickSearch};
pub use summary::{
    active_filters, results_count_label, results_heading, ActiveFilter, SortOption, SORT_OPTIONS,
};
