use serde::{Deserialize, Serialize};

/// Amortization periods offered to callers. Any year count is accepted by [`compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum AmortizationPeriod {
    Fifteen,
    Twenty,
    TwentyFive,
    Thirty,
}

impl AmortizationPeriod {
    pub const fn ordered() -> [Self; 4] {
        [Self::Fifteen, Self::Twenty, Self::TwentyFive, Self::Thirty]
    }

    pub const fn years(self) -> u32 {
        match self {
            Self::Fifteen => 15,
            Self::Twenty => 20,
            Self::TwentyFive => 25,
            Self::Thirty => 30,
        }
    }
}

impl From<AmortizationPeriod> for u32 {
    fn from(period: AmortizationPeriod) -> Self {
        period.years()
    }
}

impl TryFrom<u32> for AmortizationPeriod {
    type Error = String;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        Self::ordered()
            .into_iter()
            .find(|period| period.years() == years)
            .ok_or_else(|| format!("unsupported amortization period: {years} years"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub home_price: f64,
    pub down_payment: f64,
    pub annual_rate_percent: f64,
    pub amortization_years: u32,
}

impl Default for MortgageInputs {
    fn default() -> Self {
        Self {
            home_price: 800_000.0,
            down_payment: 160_000.0,
            annual_rate_percent: 5.5,
            amortization_years: AmortizationPeriod::TwentyFive.years(),
        }
    }
}

impl MortgageInputs {
    pub fn principal(&self) -> f64 {
        self.home_price - self.down_payment
    }

    pub fn estimate(&self) -> MortgageEstimate {
        compute(
            self.home_price,
            self.down_payment,
            self.annual_rate_percent,
            self.amortization_years,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MortgageEstimate {
    pub monthly_payment: f64,
    pub total_interest: f64,
}

/// Standard fixed-rate amortization.
///
/// A non-positive principal, a non-positive rate, a zero-length term, or any
/// non-finite input yields a zero estimate instead of an error.
pub fn compute(
    home_price: f64,
    down_payment: f64,
    annual_rate_percent: f64,
    amortization_years: u32,
) -> MortgageEstimate {
    let principal = home_price - down_payment;
    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let payments = amortization_years.saturating_mul(12);

    if !principal.is_finite() || !monthly_rate.is_finite() {
        return MortgageEstimate::default();
    }
    if principal <= 0.0 || monthly_rate <= 0.0 || payments == 0 {
        return MortgageEstimate::default();
    }

    let n = f64::from(payments);
    let growth = (1.0 + monthly_rate).powf(n);
    let monthly_payment = principal * (monthly_rate * growth) / (growth - 1.0);
    if !monthly_payment.is_finite() {
        return MortgageEstimate::default();
    }

    MortgageEstimate {
        monthly_payment,
        total_interest: monthly_payment * n - principal,
    }
}
