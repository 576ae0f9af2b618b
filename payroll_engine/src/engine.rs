//! Payroll computation engine.
//!
//! The `engine` module turns an employee, a [`BusinessConfig`] and a
//! [`PayPeriod`] into a [`PayrollOutcome`].  The pipeline order is fixed:
//! allowances, pre-tax statutory levies, taxable income, PAYE, custom and
//! individual deductions, and finally net salary.  [`run_payroll`] uses
//! the [`rayon`] crate to resolve a whole business's employees in
//! parallel; each employee's calculation is independent, so a failure
//! for one does not affect the others.

use crate::allowances::aggregate_allowances;
use crate::config::BusinessConfig;
use crate::deductions::apply_deductions;
use crate::error::PayrollError;
use crate::models::{
    DeductionBreakdown, DeductionCategory, DeductionItem, Employee, EmployeeFailure, PayPeriod,
    PayRunInput, PayRunResult, PayrollOutcome, PayrollRecord, PayrollStatus,
};
use crate::statutory::StatutoryDeductions;
use crate::tax::TaxCalculator;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Rejects input the calculators cannot meaningfully work with.
///
/// A negative outstanding balance is not an error: the deduction
/// processor clamps it to zero.
pub fn validate_employee(employee: &Employee) -> Result<(), PayrollError> {
    if !employee.basic_salary.is_finite() || employee.basic_salary < 0.0 {
        return Err(PayrollError::InvalidSalary {
            employee_id: employee.id.clone(),
            salary: employee.basic_salary,
        });
    }
    if let Some(deduction) = employee.deductions.iter().find(|d| {
        !d.monthly_amount.is_finite() || d.monthly_amount < 0.0 || !d.remaining_amount.is_finite()
    })
    {
        return Err(PayrollError::InvalidDeduction {
            employee_id: employee.id.clone(),
            description: deduction.description.clone(),
        });
    }
    Ok(())
}

/// Resolves one employee's payroll using the business's bracket schedule.
///
/// Inputs are assumed valid; see [`validate_employee`].
pub fn resolve_payroll(
    employee: &Employee,
    config: &BusinessConfig,
    period: PayPeriod,
) -> PayrollOutcome {
    resolve_payroll_with(&config.schedule(), employee, config, period)
}

/// Resolves one employee's payroll with an explicit tax calculator.
pub fn resolve_payroll_with(
    calculator: &dyn TaxCalculator,
    employee: &Employee,
    config: &BusinessConfig,
    period: PayPeriod,
) -> PayrollOutcome {
    let basic = employee.basic_salary;

    // Allowances only feed gross pay; they are never taxed or deducted.
    let allowances = aggregate_allowances(basic, &config.allowances);

    // Statutory levies come off before tax.
    let statutory = StatutoryDeductions::for_salary(basic);
    let pre_tax_total = statutory.total();
    let taxable_income = basic - pre_tax_total;

    let paye = calculator.paye(taxable_income) as f64;

    let applied = apply_deductions(basic, &config.custom_deductions, &employee.deductions, period);

    // Custom deductions are reported in the total but only reduce net
    // salary when the business opts in.
    let mut net_deductions = pre_tax_total + paye + applied.individual_total;
    if config.deduct_custom_from_net {
        net_deductions += applied.custom_total;
    }
    let net_salary = basic - net_deductions;

    // Items are listed statutory, PAYE, custom, then individual.
    let mut items = statutory.items();
    items.push(DeductionItem::new("PAYE", paye, DeductionCategory::Paye));
    items.extend(applied.items);
    let total = pre_tax_total + paye + applied.custom_total + applied.individual_total;

    debug!(
        employee_id = %employee.id,
        taxable_income,
        paye,
        net_salary,
        "resolved payroll"
    );

    PayrollOutcome {
        record: PayrollRecord {
            employee_id: employee.id.clone(),
            business_id: config.business_id.clone(),
            month: period.month,
            year: period.year,
            basic_salary: basic,
            gross_salary: basic + allowances.total,
            taxable_income,
            allowances,
            deductions: DeductionBreakdown { items, total },
            net_salary,
            status: PayrollStatus::Pending,
        },
        deductions: applied.updated,
    }
}

/// Runs payroll for every employee in `input` against `config`.
///
/// Employees are processed in parallel.  An employee that fails
/// validation is reported in [`PayRunResult::failures`] and the rest of
/// the run continues.  Repeated employee IDs are reported as failures
/// too: only the first occurrence is paid, so each employee's deduction
/// balances are amortised exactly once per run.  Fails only if the
/// period itself is invalid.
pub fn run_payroll(input: PayRunInput, config: &BusinessConfig) -> Result<PayRunResult, PayrollError> {
    let period = input.period;
    period.validate()?;

    // Resolve the schedule once; it is shared read-only across threads.
    let schedule = config.schedule();

    // Flag repeats before going parallel, keeping input order.
    let mut seen = HashSet::new();
    let employees: Vec<(Employee, bool)> = input
        .employees
        .into_iter()
        .map(|employee| {
            let first = seen.insert(employee.id.clone());
            (employee, first)
        })
        .collect();

    let results: Vec<Result<PayrollOutcome, EmployeeFailure>> = employees
        .into_par_iter()
        .map(|(employee, first)| {
            let checked = if first {
                validate_employee(&employee)
            } else {
                Err(PayrollError::DuplicateEmployee {
                    employee_id: employee.id.clone(),
                })
            };
            checked
                .map(|()| resolve_payroll_with(&schedule, &employee, config, period))
                .map_err(|err| EmployeeFailure {
                    employee_id: employee.id.clone(),
                    error: err.to_string(),
                })
        })
        .collect();

    let (outcomes, failures): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    let outcomes: Vec<PayrollOutcome> = outcomes.into_iter().filter_map(Result::ok).collect();
    let failures: Vec<EmployeeFailure> = failures.into_iter().filter_map(Result::err).collect();

    info!(
        business_id = %config.business_id,
        month = period.month,
        year = period.year,
        processed = outcomes.len(),
        failed = failures.len(),
        "payroll run complete"
    );

    Ok(PayRunResult {
        business_id: config.business_id.clone(),
        period,
        outcomes,
        failures,
    })
}
