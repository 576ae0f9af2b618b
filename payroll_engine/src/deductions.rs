//! Custom and individual deductions.
//!
//! Business-wide custom deductions apply to everyone whenever enabled.
//! Individual deductions (advances, loans) are amortised: each pay
//! period in which one is applicable takes an instalment off its
//! outstanding balance until the balance is cleared and the deduction
//! completes.
//!
//! [`apply_deductions`] never mutates its inputs.  The updated
//! individual deductions are returned for the caller to persist.

use crate::models::{
    CustomDeductionRule, DeductionCategory, DeductionItem, DeductionStatus, IndividualDeduction,
    PayPeriod,
};
use crate::money::rule_amount;

/// Deduction lines for one employee and period, plus the employee's
/// individual deductions after amortisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedDeductions {
    /// Custom items (in rule order) followed by individual items (in
    /// deduction order).
    pub items: Vec<DeductionItem>,
    pub custom_total: f64,
    pub individual_total: f64,
    /// Updated individual deductions, in input order.
    pub updated: Vec<IndividualDeduction>,
}

impl AppliedDeductions {
    pub fn total(&self) -> f64 {
        self.custom_total + self.individual_total
    }
}

/// Whether `deduction` should be taken in `period`.
///
/// Only active deductions with an outstanding balance qualify.  The
/// period must fall between the start and end months inclusive, or be
/// the start month itself.
pub fn is_applicable(deduction: &IndividualDeduction, period: PayPeriod) -> bool {
    if deduction.status != DeductionStatus::Active || deduction.remaining_amount <= 0.0 {
        return false;
    }
    let start = PayPeriod::containing(deduction.start_date);
    let is_after_start = period >= start;
    let is_before_end = deduction
        .end_date
        .map_or(true, |end| period <= PayPeriod::containing(end));
    let is_start_month = period == start;

    (is_after_start && is_before_end) || is_start_month
}

/// Takes one instalment from `deduction`, returning the amount taken.
///
/// The balance is clamped at zero and the deduction completes once the
/// balance is cleared.
fn take_instalment(deduction: &mut IndividualDeduction) -> f64 {
    let amount = deduction
        .monthly_amount
        .min(deduction.remaining_amount)
        .max(0.0);
    deduction.remaining_amount = (deduction.remaining_amount - amount).max(0.0);
    if deduction.remaining_amount == 0.0 {
        deduction.status = DeductionStatus::Completed;
    }
    amount
}

/// Repairs a negative outstanding balance to zero, completing the
/// deduction since nothing is left to take.
fn clamp_balance(deduction: &mut IndividualDeduction) {
    if deduction.remaining_amount < 0.0 {
        deduction.remaining_amount = 0.0;
        deduction.status = DeductionStatus::Completed;
    }
}

/// Applies business-wide custom deductions and the employee's individual
/// deductions for `period`.
pub fn apply_deductions(
    basic_salary: f64,
    custom_rules: &[CustomDeductionRule],
    individual: &[IndividualDeduction],
    period: PayPeriod,
) -> AppliedDeductions {
    let mut items = Vec::new();

    // Business-wide rules apply whenever enabled, no date range.
    let mut custom_total = 0.0;
    for rule in custom_rules.iter().filter(|rule| rule.enabled) {
        let amount = rule_amount(rule.kind, rule.value, basic_salary);
        custom_total += amount;
        items.push(DeductionItem::new(
            rule.name.clone(),
            amount,
            DeductionCategory::Custom,
        ));
    }

    let mut individual_total = 0.0;
    let mut updated = individual.to_vec();
    for deduction in updated.iter_mut() {
        if !is_applicable(deduction, period) {
            clamp_balance(deduction);
            continue;
        }
        // Instalment is capped at what is still owed.
        let amount = take_instalment(deduction);
        individual_total += amount;
        items.push(DeductionItem {
            name: deduction.description.clone(),
            amount,
            category: DeductionCategory::Individual,
            deduction_type: Some(deduction.deduction_type.clone()),
        });
    }

    AppliedDeductions {
        items,
        custom_total,
        individual_total,
        updated,
    }
}
