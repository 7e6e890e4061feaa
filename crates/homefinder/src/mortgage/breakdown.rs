use serde::Serialize;

use super::amortization::{MortgageEstimate, MortgageInputs};

pub const ANNUAL_PROPERTY_TAX_RATE: f64 = 0.012;
pub const ANNUAL_INSURANCE_RATE: f64 = 0.003;

/// Display lines shown beside an estimate. Tax and insurance are rough
/// percentages of the home price, independent of the amortization math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MortgageBreakdown {
    pub mortgage_amount: f64,
    pub down_payment_percent: f64,
    pub principal_and_interest: f64,
    pub total_interest: f64,
    pub property_tax_monthly: f64,
    pub insurance_monthly: f64,
    pub total_monthly_cost: f64,
}

impl MortgageBreakdown {
    pub fn new(inputs: &MortgageInputs) -> Self {
        Self::from_estimate(inputs, inputs.estimate())
    }

    pub fn from_estimate(inputs: &MortgageInputs, estimate: MortgageEstimate) -> Self {
        let home_price = inputs.home_price;
        let down_payment_percent = if home_price > 0.0 {
            inputs.down_payment / home_price * 100.0
        } else {
            0.0
        };

        Self {
            mortgage_amount: inputs.principal(),
            down_payment_percent,
            principal_and_interest: estimate.monthly_payment,
            total_interest: estimate.total_interest,
            property_tax_monthly: (home_price * ANNUAL_PROPERTY_TAX_RATE / 12.0).round(),
            insurance_monthly: (home_price * ANNUAL_INSURANCE_RATE / 12.0).round(),
            total_monthly_cost: estimate.monthly_payment
                + home_price * (ANNUAL_PROPERTY_TAX_RATE + ANNUAL_INSURANCE_RATE) / 12.0,
        }
    }
}
