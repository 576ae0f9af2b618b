//! Data models for the Payroll Engine.
//!
//! The `models` module defines the serialisable structs and enums
//! representing employees, business payroll rules, pay periods and the
//! payroll records produced by the engine.  These data types derive
//! `Serialize` and `Deserialize` so that they can be persisted by the
//! caller or transmitted over a network.

use crate::error::PayrollError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single band of a progressive income tax schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower bound of the band.
    pub lower_bound: f64,
    /// Upper bound of the band.  `None` means the band has no upper
    /// limit.  The last band of a schedule is treated as unbounded
    /// regardless of this value.
    #[serde(default)]
    pub upper_bound: Option<f64>,
    /// Marginal rate for income in this band, expressed 0-100.
    pub rate: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl TaxBracket {
    pub fn new(lower_bound: f64, upper_bound: Option<f64>, rate: f64) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
            enabled: true,
        }
    }
}

/// How a configurable rule derives its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// `value` is a percentage (0-100) of basic salary.
    Percentage,
    /// `value` is a fixed amount per pay period.
    Fixed,
}

/// A business-wide allowance such as a housing or transport allowance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceRule {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub value: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// A business-wide deduction applied to every employee, e.g. a welfare
/// contribution.  Has the same shape as an allowance but no date range.
pub type CustomDeductionRule = AllowanceRule;

fn enabled_by_default() -> bool {
    true
}

/// Lifecycle of an [`IndividualDeduction`].  `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionStatus {
    #[default]
    Active,
    Completed,
}

/// An employee-specific deduction amortised over successive pay
/// periods, such as a salary advance or a loan repayment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualDeduction {
    /// Identifier assigned by the persistence layer, if any.
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    /// Free-form category, e.g. `"advance"` or `"loan"`.
    #[serde(rename = "type")]
    pub deduction_type: String,
    /// Original total amount of the deduction.
    pub amount: f64,
    /// Instalment taken each pay period.
    pub monthly_amount: f64,
    /// Outstanding balance.  Never increases and never drops below zero.
    pub remaining_amount: f64,
    pub start_date: NaiveDate,
    /// Last month in which the deduction may be taken.  `None` means
    /// the deduction runs until the balance is cleared.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: DeductionStatus,
}

/// A monthly pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Year comes first so that the derived ordering is chronological.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl PayPeriod {
    /// Builds a pay period, rejecting months outside `1..=12`.
    pub fn new(month: u32, year: i32) -> Result<Self, PayrollError> {
        let period = Self { year, month };
        period.validate()?;
        Ok(period)
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Checks a period that may have been deserialised without going
    /// through [`PayPeriod::new`].
    pub fn validate(&self) -> Result<(), PayrollError> {
        if (1..=12).contains(&self.month) {
            Ok(())
        } else {
            Err(PayrollError::InvalidPeriod { month: self.month })
        }
    }
}

/// An employee as seen by the payroll engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// A unique identifier for the employee within the business.
    pub id: String,
    /// The employee's full name.
    pub name: String,
    /// Monthly basic salary.
    pub basic_salary: f64,
    /// Outstanding individual deductions.  Balances are updated by the
    /// engine and returned to the caller for persistence.
    #[serde(default)]
    pub deductions: Vec<IndividualDeduction>,
}

/// A computed allowance line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceItem {
    pub name: String,
    pub amount: f64,
}

/// Where a deduction line originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionCategory {
    /// Pre-tax statutory levy (health, pension, housing).
    Statutory,
    /// Income tax withheld.
    Paye,
    /// Business-wide custom deduction.
    Custom,
    /// Employee-specific amortised deduction.
    Individual,
}

/// A computed deduction line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionItem {
    pub name: String,
    pub amount: f64,
    pub category: DeductionCategory,
    /// The individual deduction's type, e.g. `"advance"`.  Only set for
    /// individual deductions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduction_type: Option<String>,
}

impl DeductionItem {
    pub fn new(name: impl Into<String>, amount: f64, category: DeductionCategory) -> Self {
        Self {
            name: name.into(),
            amount,
            category,
            deduction_type: None,
        }
    }

    pub fn is_individual(&self) -> bool {
        self.category == DeductionCategory::Individual
    }
}

/// Allowance lines and their sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowanceBreakdown {
    pub items: Vec<AllowanceItem>,
    pub total: f64,
}

/// Deduction lines and their sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    pub items: Vec<DeductionItem>,
    pub total: f64,
}

/// Processing state of a payroll record.  The engine always produces
/// `Pending`; approval and payment happen outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    #[default]
    Pending,
    Approved,
    Paid,
}

/// The payroll for one employee in one pay period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub employee_id: String,
    pub business_id: String,
    pub month: u32,
    pub year: i32,
    pub basic_salary: f64,
    /// Basic salary plus allowances.  Reporting only.
    pub gross_salary: f64,
    /// Basic salary minus pre-tax statutory deductions.
    pub taxable_income: f64,
    pub allowances: AllowanceBreakdown,
    pub deductions: DeductionBreakdown,
    pub net_salary: f64,
    pub status: PayrollStatus,
}

/// A payroll record together with the employee's updated individual
/// deductions, which the caller must persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollOutcome {
    pub record: PayrollRecord,
    pub deductions: Vec<IndividualDeduction>,
}

/// Input to a pay run for a single business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunInput {
    /// The period being processed.
    pub period: PayPeriod,
    /// The employees to be paid in this run.
    pub employees: Vec<Employee>,
}

/// An employee whose payroll could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeFailure {
    pub employee_id: String,
    pub error: String,
}

/// The aggregate result of a pay run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunResult {
    pub business_id: String,
    pub period: PayPeriod,
    /// Successful results, in input order.
    pub outcomes: Vec<PayrollOutcome>,
    /// Employees that were skipped, in input order.
    pub failures: Vec<EmployeeFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pay_period_rejects_out_of_range_month() {
        assert_eq!(
            PayPeriod::new(13, 2024),
            Err(PayrollError::InvalidPeriod { month: 13 })
        );
        assert!(PayPeriod::new(0, 2024).is_err());
        assert!(PayPeriod::new(12, 2024).is_ok());
    }

    #[test]
    fn test_pay_periods_order_chronologically() {
        let dec_2023 = PayPeriod::new(12, 2023).unwrap();
        let jan_2024 = PayPeriod::new(1, 2024).unwrap();
        assert!(dec_2023 < jan_2024);
    }

    #[test]
    fn test_individual_deduction_deserialises_with_defaults() {
        let deduction: IndividualDeduction = serde_json::from_value(json!({
            "description": "Salary advance",
            "type": "advance",
            "amount": 10000.0,
            "monthly_amount": 2000.0,
            "remaining_amount": 10000.0,
            "start_date": "2024-03-01"
        }))
        .unwrap();
        assert_eq!(deduction.status, DeductionStatus::Active);
        assert_eq!(deduction.end_date, None);
        assert_eq!(
            PayPeriod::containing(deduction.start_date),
            PayPeriod::new(3, 2024).unwrap()
        );
    }

    #[test]
    fn test_rule_kind_uses_lowercase_names() {
        let rule: AllowanceRule = serde_json::from_value(json!({
            "name": "Housing",
            "type": "percentage",
            "value": 15.0
        }))
        .unwrap();
        assert_eq!(rule.kind, RuleKind::Percentage);
        assert!(rule.enabled);
    }
}
