//! Credit simulation: amortized-loan arithmetic for the simulator page.
//!
//! Everything here is pure and stateless; the calculator never touches
//! the ledger store. Unlike the rest of the crate this module works in
//! `f64`: the amortization formula runs at full double precision with
//! no internal rounding, display rounding is the caller's business.

/// Result of an amortization computation, unrounded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Amortization {
    pub monthly_payment: f64,
    pub total_repaid: f64,
    pub total_interest: f64,
}

/// Computes the fixed monthly payment for a loan of `principal` at
/// `annual_rate_percent` over `years`.
///
/// Standard amortization formula with a zero-rate fallback:
/// `monthly = P * (r * (1+r)^n) / ((1+r)^n - 1)` where `r` is the
/// monthly rate and `n` the number of monthly payments.
#[must_use]
pub fn compute_amortization(principal: f64, annual_rate_percent: f64, years: u32) -> Amortization {
    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let months = f64::from(years * 12);

    if monthly_rate == 0.0 {
        return Amortization {
            monthly_payment: principal / months,
            total_repaid: principal,
            total_interest: 0.0,
        };
    }

    let growth = (1.0 + monthly_rate).powf(months);
    let monthly_payment = principal * (monthly_rate * growth) / (growth - 1.0);
    let total_repaid = monthly_payment * months;

    Amortization {
        monthly_payment,
        total_repaid,
        total_interest: total_repaid - principal,
    }
}

/// Loan presets offered by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoanProject {
    Immobilier,
    Consommation,
    Auto,
}

impl LoanProject {
    pub const ALL: [LoanProject; 3] = [Self::Immobilier, Self::Consommation, Self::Auto];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immobilier => "immobilier",
            Self::Consommation => "consommation",
            Self::Auto => "auto",
        }
    }

    /// Human label shown by the simulator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Immobilier => "Immobilier",
            Self::Consommation => "Consommation",
            Self::Auto => "Auto",
        }
    }

    /// Estimated fixed annual rate, in percent.
    #[must_use]
    pub const fn annual_rate_percent(self) -> f64 {
        match self {
            Self::Immobilier => 3.5,
            Self::Consommation => 5.0,
            Self::Auto => 4.5,
        }
    }

    /// `(min, max, default)` borrowable amount, in euros.
    #[must_use]
    pub const fn amount_range(self) -> (f64, f64, f64) {
        match self {
            Self::Immobilier => (20_000.0, 500_000.0, 150_000.0),
            Self::Consommation => (1_000.0, 75_000.0, 10_000.0),
            Self::Auto => (1_000.0, 50_000.0, 15_000.0),
        }
    }

    /// `(min, max, default)` repayment duration, in years.
    #[must_use]
    pub const fn duration_range(self) -> (u32, u32, u32) {
        match self {
            Self::Immobilier => (5, 25, 20),
            Self::Consommation => (1, 10, 5),
            Self::Auto => (1, 7, 4),
        }
    }
}

impl TryFrom<&str> for LoanProject {
    type Error = crate::LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "immobilier" => Ok(Self::Immobilier),
            "consommation" => Ok(Self::Consommation),
            "auto" => Ok(Self::Auto),
            other => Err(crate::LedgerError::KeyNotFound(format!(
                "invalid loan project: {other}"
            ))),
        }
    }
}
