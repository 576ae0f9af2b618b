//! Statutory levies deducted from basic salary before tax.
//!
//! The rates are fixed by law rather than configured per business, so
//! every employee gets the same three levies.

use crate::models::{DeductionCategory, DeductionItem};
use crate::money::round_currency;

pub const HEALTH_RATE: f64 = 0.0275;
pub const PENSION_RATE: f64 = 0.06;
pub const PENSION_CAP: f64 = 1_080.0;
pub const HOUSING_RATE: f64 = 0.015;

pub fn health_levy(basic_salary: f64) -> f64 {
    round_currency(basic_salary * HEALTH_RATE)
}

/// Pension contribution, capped at [`PENSION_CAP`].
pub fn pension_levy(basic_salary: f64) -> f64 {
    round_currency(basic_salary * PENSION_RATE).min(PENSION_CAP)
}

pub fn housing_levy(basic_salary: f64) -> f64 {
    round_currency(basic_salary * HOUSING_RATE)
}

/// The pre-tax levies for one basic salary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatutoryDeductions {
    pub health: f64,
    pub pension: f64,
    pub housing: f64,
}

impl StatutoryDeductions {
    pub fn for_salary(basic_salary: f64) -> Self {
        Self {
            health: health_levy(basic_salary),
            pension: pension_levy(basic_salary),
            housing: housing_levy(basic_salary),
        }
    }

    pub fn total(&self) -> f64 {
        self.health + self.pension + self.housing
    }

    /// Line items in reporting order: health, pension, housing.
    pub fn items(&self) -> Vec<DeductionItem> {
        vec![
            DeductionItem::new("Health Insurance", self.health, DeductionCategory::Statutory),
            DeductionItem::new("Pension", self.pension, DeductionCategory::Statutory),
            DeductionItem::new("Housing Levy", self.housing, DeductionCategory::Statutory),
        ]
    }
}
