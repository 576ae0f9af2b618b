//! Error types for the payroll engine.
//!
//! Library functions that can reject their input return
//! [`PayrollError`].  The HTTP layer and binary wrap these in
//! `anyhow::Error` where a richer context chain is useful.

use thiserror::Error;

/// Errors raised while validating or resolving payroll.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayrollError {
    /// The pay period month was outside `1..=12`.
    #[error("invalid pay period month {month}; expected 1-12")]
    InvalidPeriod { month: u32 },

    /// The employee's basic salary was negative or not a finite number.
    #[error("employee {employee_id} has invalid basic salary {salary}")]
    InvalidSalary { employee_id: String, salary: f64 },

    /// An individual deduction carried a negative or non-finite amount.
    #[error("employee {employee_id} has invalid deduction '{description}'")]
    InvalidDeduction {
        employee_id: String,
        description: String,
    },

    /// The same employee appeared more than once in a pay run.
    #[error("employee {employee_id} appears more than once in the pay run")]
    DuplicateEmployee { employee_id: String },

    /// The configuration store could not be read.
    #[error("configuration store error: {0}")]
    ConfigStore(String),
}
