//! PAYE calculation over progressive tax brackets.
//!
//! The `tax` module defines the [`TaxCalculator`] trait the resolver
//! depends on and [`BracketSchedule`], the marginal-rate implementation
//! built from a business's configured brackets.  Tax is rounded to whole
//! currency units inside each bracket, not only at the end, and a flat
//! personal relief is subtracted from the accumulated amount.

use crate::models::TaxBracket;
use crate::money::round_currency;
use tracing::warn;

/// Monthly personal relief subtracted from computed tax.
pub const PERSONAL_RELIEF: f64 = 2_400.0;

/// The schedule used when a business has no usable brackets configured.
pub fn default_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(0.0, Some(24_000.0), 10.0),
        TaxBracket::new(24_001.0, Some(32_333.0), 25.0),
        TaxBracket::new(32_334.0, Some(500_000.0), 30.0),
        TaxBracket::new(500_001.0, Some(800_000.0), 32.5),
        TaxBracket::new(800_001.0, None, 35.0),
    ]
}

/// A tax calculator determines the PAYE to withhold for a taxable
/// income figure.
///
/// Tax calculators must be thread-safe (`Send + Sync`) because pay runs
/// invoke them concurrently across multiple threads.
pub trait TaxCalculator: Send + Sync {
    /// Returns the tax due on `taxable_income`, in whole currency units.
    fn paye(&self, taxable_income: f64) -> i64;
}

/// A resolved, sorted set of enabled brackets plus the relief to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
    relief: f64,
}

impl BracketSchedule {
    /// Resolves `brackets` into a schedule.
    ///
    /// Disabled brackets are dropped and the remainder sorted by lower
    /// bound.  If nothing usable remains, or any enabled bracket is
    /// malformed, the [`default_brackets`] are used instead so that
    /// payroll can always be computed.
    pub fn new(brackets: &[TaxBracket], relief: f64) -> Self {
        let mut enabled: Vec<TaxBracket> =
            brackets.iter().filter(|b| b.enabled).cloned().collect();

        let usable = !enabled.is_empty() && enabled.iter().all(is_well_formed);
        if !usable {
            if !brackets.is_empty() {
                warn!(
                    configured = brackets.len(),
                    "tax brackets unusable, falling back to default schedule"
                );
            }
            enabled = default_brackets();
        }
        enabled.sort_by(|a, b| a.lower_bound.total_cmp(&b.lower_bound));

        let relief = if relief.is_finite() && relief >= 0.0 {
            relief
        } else {
            PERSONAL_RELIEF
        };
        Self {
            brackets: enabled,
            relief,
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn relief(&self) -> f64 {
        self.relief
    }
}

impl Default for BracketSchedule {
    fn default() -> Self {
        Self::new(&default_brackets(), PERSONAL_RELIEF)
    }
}

impl TaxCalculator for BracketSchedule {
    fn paye(&self, taxable_income: f64) -> i64 {
        if !taxable_income.is_finite() || taxable_income <= 0.0 {
            return 0;
        }

        let last = self.brackets.len().saturating_sub(1);
        let mut remaining = taxable_income;
        let mut tax = 0.0;
        for (idx, bracket) in self.brackets.iter().enumerate() {
            let width = match bracket.upper_bound {
                Some(upper) if idx < last => upper - bracket.lower_bound,
                _ => f64::INFINITY,
            };
            let in_bracket = remaining.min(width);
            tax += round_currency(in_bracket * bracket.rate / 100.0);
            remaining -= in_bracket;
            if remaining <= 0.0 {
                break;
            }
        }

        // A fractional relief is allowed; round before dropping to whole units.
        round_currency((tax - self.relief).max(0.0)) as i64
    }
}

fn is_well_formed(bracket: &TaxBracket) -> bool {
    let bounds_ok = bracket.lower_bound.is_finite()
        && bracket.lower_bound >= 0.0
        && match bracket.upper_bound {
            Some(upper) => upper.is_finite() && upper >= bracket.lower_bound,
            None => true,
        };
    bounds_ok && bracket.rate.is_finite() && (0.0..=100.0).contains(&bracket.rate)
}

/// Computes PAYE on `taxable_income` with the standard personal relief.
///
/// An empty or malformed `brackets` slice falls back to the default
/// schedule.
pub fn calculate_paye(taxable_income: f64, brackets: &[TaxBracket]) -> i64 {
    calculate_paye_with_relief(taxable_income, brackets, PERSONAL_RELIEF)
}

/// Computes PAYE on `taxable_income` with an explicit personal relief.
pub fn calculate_paye_with_relief(taxable_income: f64, brackets: &[TaxBracket], relief: f64) -> i64 {
    BracketSchedule::new(brackets, relief).paye(taxable_income)
}
