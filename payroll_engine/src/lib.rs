//! Payroll Engine library crate.
//!
//! This crate exposes the payroll calculation engine (PAYE brackets,
//! statutory levies, allowances, amortised deductions) and API
//! components as reusable modules.  External applications may depend
//! on the `payroll_engine` crate and call into `engine::resolve_payroll`
//! or `engine::run_payroll` directly, or embed the API via
//! `api::build_router`.

pub mod models;
pub mod error;
pub mod money;
pub mod tax;
pub mod statutory;
pub mod allowances;
pub mod deductions;
pub mod config;
pub mod engine;
pub mod settings;
pub mod api;

pub use config::{BusinessConfig, ConfigStore, InMemoryConfigStore};
pub use engine::{resolve_payroll, run_payroll};
pub use error::PayrollError;
pub use tax::calculate_paye;
