use homefinder::config::{AppConfig, StorageConfig};
use homefinder::error::AppError;
use homefinder::listings::filters::{PriceKindFilter, SortOption};
use homefinder::listings::{ListingCatalog, ListingService};
use homefinder::mortgage::AmortizationPeriod;
use homefinder::storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store selected at startup: durable when a state directory is configured.
#[derive(Debug, Clone)]
pub(crate) enum StateStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl StateStore {
    pub(crate) fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        match &config.state_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "persisting saved listings and session to disk");
                Ok(Self::File(FileStore::open(dir)?))
            }
            None => Ok(Self::Memory(MemoryStore::default())),
        }
    }
}

impl KeyValueStore for StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(store) => store.get(key),
            Self::File(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(key, value),
            Self::File(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.remove(key),
            Self::File(store) => store.remove(key),
        }
    }
}

pub(crate) fn build_listing_service(
    config: &AppConfig,
) -> Result<Arc<ListingService<StateStore>>, AppError> {
    let catalog = ListingCatalog::load(&config.listings)?;
    let store = Arc::new(StateStore::open(&config.storage)?);
    info!(listings = catalog.len(), "listing catalog ready");

    Ok(Arc::new(ListingService::new(
        catalog,
        store,
        config.listings.guest_result_limit,
    )))
}

pub(crate) fn parse_price_kind(raw: &str) -> Result<PriceKindFilter, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "all" => Ok(PriceKindFilter::All),
        "sale" | "buy" => Ok(PriceKindFilter::Sale),
        "lease" | "rent" => Ok(PriceKindFilter::Lease),
        other => Err(format!("unknown price kind '{other}' (expected all, sale, or lease)")),
    }
}

pub(crate) fn parse_sort_option(raw: &str) -> Result<SortOption, String> {
    SortOption::find(raw).ok_or_else(|| {
        format!("unknown sort '{raw}' (expected price-asc, price-desc, date-desc, or size-desc)")
    })
}

pub(crate) fn parse_amortization(raw: &str) -> Result<AmortizationPeriod, String> {
    let years = raw
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("failed to parse '{raw}' as a year count ({err})"))?;
    AmortizationPeriod::try_from(years)
}

/// Whole-dollar rendering with thousands separators; negatives keep their sign.
pub(crate) fn money(value: f64) -> String {
    let rounded = value.round();
    let grouped = homefinder::listings::domain::format_cad(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_selectors() {
        assert_eq!(parse_price_kind("Rent"), Ok(PriceKindFilter::Lease));
        assert!(parse_price_kind("barter").is_err());
        assert_eq!(
            parse_sort_option("price-asc").map(|option| option.label),
            Ok("Price: Low to High")
        );
        assert_eq!(parse_amortization("30"), Ok(AmortizationPeriod::Thirty));
        assert!(parse_amortization("40").is_err());
    }

    #[test]
    fn money_rounds_and_groups() {
        assert_eq!(money(3930.16), "$3,930");
        assert_eq!(money(-50_000.0), "-$50,000");
        assert_eq!(money(0.2), "$0");
    }
}
