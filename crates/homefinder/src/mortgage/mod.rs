//! Fixed-rate mortgage estimates.

mod amortization;
mod breakdown;

pub use amortization::{compute, AmortizationPeriod, MortgageEstimate, MortgageInputs};
pub use breakdown::{
    MortgageBreakdown, ANNUAL_INSURANCE_RATE, ANNUAL_PROPERTY_TAX_RATE,
};
