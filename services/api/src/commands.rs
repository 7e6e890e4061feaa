use crate::infra::{money, parse_amortization, parse_price_kind, parse_sort_option};
use clap::Args;
use homefinder::config::AppConfig;
use homefinder::error::AppError;
use homefinder::listings::filters::input::{
    coerce_max_price, coerce_min_price, coerce_threshold, parse_price_range,
};
use homefinder::listings::filters::{
    self, active_filters, results_count_label, results_heading, FilterConfiguration, FilterPatch,
    NumericInput, PriceKindFilter, SortOption,
};
use homefinder::listings::{gate_results, Listing, ListingCatalog, PropertyKind, ResultPage};
use homefinder::mortgage::{AmortizationPeriod, MortgageBreakdown, MortgageInputs};
use homefinder::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Restrict to sale or lease listings (all, sale, lease)
    #[arg(long, value_parser = parse_price_kind)]
    pub(crate) price_kind: Option<PriceKindFilter>,
    /// Inclusive lower price bound. Non-numeric input means no floor.
    #[arg(long)]
    pub(crate) min_price: Option<String>,
    /// Inclusive upper price bound. Zero or non-numeric input means no ceiling.
    #[arg(long)]
    pub(crate) max_price: Option<String>,
    /// Price range label such as "$500,000-$1,000,000"; explicit bounds win
    #[arg(long)]
    pub(crate) price_range: Option<String>,
    /// Minimum bedroom count
    #[arg(long)]
    pub(crate) bedrooms: Option<String>,
    /// Minimum bathroom count
    #[arg(long)]
    pub(crate) bathrooms: Option<String>,
    /// Property type (house, condo, townhouse, apartment)
    #[arg(long, value_parser = parse_property_kind)]
    pub(crate) property_kind: Option<PropertyKind>,
    /// Case-insensitive match against address, city, or title
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Sort option (price-asc, price-desc, date-desc, size-desc)
    #[arg(long, value_parser = parse_sort_option)]
    pub(crate) sort: Option<SortOption>,
    /// Search as a signed-in member instead of a guest
    #[arg(long)]
    pub(crate) signed_in: bool,
    /// Listing file (JSON or CSV) overriding APP_LISTINGS_PATH
    #[arg(long)]
    pub(crate) listings: Option<PathBuf>,
    /// Print the result page as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl SearchArgs {
    fn patch(&self) -> FilterPatch {
        let mut patch = FilterPatch {
            price_kind: self.price_kind,
            bedrooms: self.bedrooms.as_deref().map(threshold),
            bathrooms: self.bathrooms.as_deref().map(threshold),
            property_kind: self.property_kind.map(Some),
            location: self.location.clone(),
            ..FilterPatch::default()
        };

        if let Some(range) = self.price_range.as_deref() {
            let (min, max) = parse_price_range(range);
            patch.min_price = Some(min);
            patch.max_price = Some(max);
        }
        if let Some(raw) = self.min_price.as_deref() {
            patch.min_price = Some(coerce_min_price(&NumericInput::from(raw)));
        }
        if let Some(raw) = self.max_price.as_deref() {
            patch.max_price = Some(coerce_max_price(&NumericInput::from(raw)));
        }
        if let Some(option) = self.sort {
            patch.sort_by = Some(option.sort_by);
            patch.sort_order = Some(option.sort_order);
        }

        patch
    }
}

#[derive(Args, Debug)]
pub(crate) struct MortgageArgs {
    /// Purchase price in CAD
    #[arg(long, default_value_t = MortgageInputs::default().home_price)]
    pub(crate) home_price: f64,
    /// Down payment in CAD
    #[arg(long, default_value_t = MortgageInputs::default().down_payment)]
    pub(crate) down_payment: f64,
    /// Annual interest rate in percent
    #[arg(long, default_value_t = MortgageInputs::default().annual_rate_percent)]
    pub(crate) rate: f64,
    /// Amortization period in years (15, 20, 25, 30)
    #[arg(long, default_value = "25", value_parser = parse_amortization)]
    pub(crate) years: AmortizationPeriod,
    /// Print the estimate as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_property_kind(raw: &str) -> Result<PropertyKind, String> {
    PropertyKind::parse(raw).ok_or_else(|| {
        format!("unknown property type '{raw}' (expected house, condo, townhouse, or apartment)")
    })
}

fn threshold(raw: &str) -> u8 {
    coerce_threshold(&NumericInput::from(raw))
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.listings.clone() {
        config.listings.source_path = Some(path);
    }
    telemetry::init_cli(&config.telemetry)?;

    let catalog = ListingCatalog::load(&config.listings)?;
    let criteria = FilterConfiguration::default().patched(&args.patch());
    let results = filters::apply(catalog.window(args.signed_in), &criteria);
    let page = gate_results(
        results,
        args.signed_in,
        config.listings.guest_result_limit,
    );

    if args.json {
        println!("{}", render_json(&page)?);
        return Ok(());
    }

    render_search(&criteria, &page);
    Ok(())
}

pub(crate) fn run_mortgage(args: MortgageArgs) -> Result<(), AppError> {
    let inputs = MortgageInputs {
        home_price: args.home_price,
        down_payment: args.down_payment,
        annual_rate_percent: args.rate,
        amortization_years: args.years.years(),
    };
    let breakdown = MortgageBreakdown::new(&inputs);

    if args.json {
        println!("{}", render_json(&breakdown)?);
        return Ok(());
    }

    println!("Mortgage estimate");
    println!(
        "  Home price {} | down payment {} ({:.1}%)",
        money(inputs.home_price),
        money(inputs.down_payment),
        breakdown.down_payment_percent
    );
    println!(
        "  Rate {:.2}% over {} years",
        inputs.annual_rate_percent, inputs.amortization_years
    );
    println!("  Mortgage amount: {}", money(breakdown.mortgage_amount));
    println!(
        "  Principal & interest: ${:.2}/mo",
        breakdown.principal_and_interest
    );
    println!("  Property tax: {}/mo", money(breakdown.property_tax_monthly));
    println!("  Insurance: {}/mo", money(breakdown.insurance_monthly));
    println!("  Total monthly cost: {}", money(breakdown.total_monthly_cost));
    println!("  Total interest: {}", money(breakdown.total_interest));
    Ok(())
}

fn render_search(criteria: &FilterConfiguration, page: &ResultPage) {
    println!("{}", results_heading(criteria.price_kind));
    println!("{}", results_count_label(page.total_matches));

    let active = active_filters(criteria);
    if !active.is_empty() {
        let labels: Vec<&str> = active.iter().map(|filter| filter.label.as_str()).collect();
        println!("Active filters: {}", labels.join(", "));
    }

    for listing in &page.listings {
        render_listing(listing);
    }

    if page.truncated {
        println!(
            "\nShowing {} of {} matches. Sign in to see every listing.",
            page.shown(),
            page.total_matches
        );
    }
}

fn render_listing(listing: &Listing) {
    println!(
        "\n[{}] {}{}",
        listing.id,
        listing.title,
        if listing.featured { " (featured)" } else { "" }
    );
    println!(
        "  {} | {} | {}",
        listing.price_label(),
        listing.price_kind.badge(),
        listing.property_kind.label()
    );
    println!("  {}", listing.full_address());
    println!(
        "  {} bd | {} ba | {} sqft | listed {}",
        listing.bedrooms,
        listing.bathrooms,
        listing.sqft,
        listing.listing_date.format("%b %-d, %Y")
    );
}

fn render_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homefinder::listings::filters::{SortKey, SortOrder, SENTINEL_MAX_PRICE};

    #[test]
    fn search_args_coerce_raw_values() {
        let args = SearchArgs {
            min_price: Some("abc".to_string()),
            max_price: Some("0".to_string()),
            bedrooms: Some("3 or more".to_string()),
            ..SearchArgs::default()
        };

        let patch = args.patch();
        assert_eq!(patch.min_price, Some(0));
        assert_eq!(patch.max_price, Some(SENTINEL_MAX_PRICE));
        assert_eq!(patch.bedrooms, Some(3));
        assert_eq!(patch.bathrooms, None);
    }

    #[test]
    fn explicit_bounds_override_price_range() {
        let args = SearchArgs {
            price_range: Some("$500,000-$1,000,000".to_string()),
            max_price: Some("750000".to_string()),
            sort: parse_sort_option("price-asc").ok(),
            ..SearchArgs::default()
        };

        let patch = args.patch();
        assert_eq!(patch.min_price, Some(500_000));
        assert_eq!(patch.max_price, Some(750_000));
        assert_eq!(patch.sort_by, Some(SortKey::Price));
        assert_eq!(patch.sort_order, Some(SortOrder::Asc));
    }

    #[test]
    fn json_output_failures_surface_as_errors() {
        let mut unserializable = std::collections::HashMap::new();
        unserializable.insert((1, 2), "tuple keys are not valid JSON object keys");

        let err = render_json(&unserializable).expect_err("encoding fails");
        assert!(matches!(err, AppError::Encode(_)));
        assert!(render_json(&MortgageBreakdown::new(&MortgageInputs::default())).is_ok());
    }

    #[test]
    fn property_kind_parser_rejects_unknown_types() {
        assert_eq!(parse_property_kind("Condo"), Ok(PropertyKind::Condo));
        assert!(parse_property_kind("castle").is_err());
    }
}
