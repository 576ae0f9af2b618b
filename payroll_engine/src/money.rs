//! Currency helpers shared by the calculators.

use crate::models::RuleKind;

/// Rounds to whole currency units, with halves rounding towards positive
/// infinity.
///
/// This is the rounding the existing payroll figures were produced with,
/// so `2.5` becomes `3` and `-2.5` becomes `-2`.
///
/// ```
/// use payroll_engine::money::round_currency;
///
/// assert_eq!(round_currency(1374.5), 1375.0);
/// assert_eq!(round_currency(1374.49), 1374.0);
/// assert_eq!(round_currency(-2.5), -2.0);
/// ```
pub fn round_currency(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Evaluates a percentage-or-fixed rule against a basic salary.
///
/// Percentages are expressed 0-100 and are not rounded.
pub fn rule_amount(kind: RuleKind, value: f64, basic_salary: f64) -> f64 {
    match kind {
        RuleKind::Percentage => basic_salary * value / 100.0,
        RuleKind::Fixed => value,
    }
}
