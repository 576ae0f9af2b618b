//! HTTP API for the Payroll Engine.
//!
//! This module exposes a minimal REST API around the payroll engine
//! using the [`axum`](https://crates.io/crates/axum) framework.  Clients
//! submit a pay run for a business and receive the payroll records and
//! updated individual deductions as JSON.  Business configuration comes
//! from the [`ConfigStore`] held in the shared state.

use crate::config::{BusinessConfig, ConfigStore, InMemoryConfigStore};
use crate::engine::run_payroll;
use crate::error::PayrollError;
use crate::models::PayRunInput;
use crate::settings::Settings;
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application state shared across requests.
pub struct AppState {
    pub configs: Arc<dyn ConfigStore>,
}

/// Build the API router around `configs`.
pub fn build_router(configs: Arc<dyn ConfigStore>) -> Router {
    let state = Arc::new(AppState { configs });
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/businesses/:business_id/payroll", post(payroll_handler))
        .route("/api/businesses/:business_id/config", get(config_handler))
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(json!({"error": message.to_string()}))).into_response()
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Handler for POST /api/businesses/:business_id/payroll
async fn payroll_handler(
    State(app_state): State<Arc<AppState>>,
    Path(business_id): Path<String>,
    Json(input): Json<PayRunInput>,
) -> Response {
    let config = match app_state.configs.business_config(&business_id) {
        Ok(Some(config)) => config,
        Ok(None) => {
            warn!(%business_id, "no payroll configuration, using defaults");
            BusinessConfig::with_defaults(business_id)
        }
        Err(err) => {
            error!(%business_id, %err, "configuration lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, err);
        }
    };
    match run_payroll(input, &config) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err @ PayrollError::InvalidPeriod { .. }) => {
            error_response(StatusCode::BAD_REQUEST, err)
        }
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err),
    }
}

/// Handler for GET /api/businesses/:business_id/config
async fn config_handler(
    State(app_state): State<Arc<AppState>>,
    Path(business_id): Path<String>,
) -> Response {
    match app_state.configs.business_config(&business_id) {
        Ok(Some(config)) => (StatusCode::OK, Json(config)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("no payroll configuration for business {business_id}"),
        ),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err),
    }
}

/// Launch the API server.  This function loads business configurations
/// from the configured directory and binds to the configured address.
/// It blocks until the server terminates (e.g. when interrupted).
pub async fn serve(settings: Settings) -> Result<()> {
    let store = InMemoryConfigStore::load_dir(&settings.config_dir)?;
    let router = build_router(Arc::new(store));
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, PayPeriod};

    fn state_with(config: Option<BusinessConfig>) -> State<Arc<AppState>> {
        let store = InMemoryConfigStore::new();
        if let Some(config) = config {
            store.insert(config).unwrap();
        }
        State(Arc::new(AppState {
            configs: Arc::new(store),
        }))
    }

    fn input(month: u32) -> PayRunInput {
        PayRunInput {
            period: PayPeriod { year: 2024, month },
            employees: vec![Employee {
                id: "e1".into(),
                name: "Jane".into(),
                basic_salary: 50_000.0,
                deductions: Vec::new(),
            }],
        }
    }

    #[tokio::test]
    async fn test_payroll_uses_defaults_for_unknown_business() {
        let response = payroll_handler(state_with(None), Path("acme".into()), Json(input(6))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_payroll_rejects_invalid_month() {
        let response = payroll_handler(state_with(None), Path("acme".into()), Json(input(13))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_config_lookup_reports_missing_business() {
        let state = state_with(Some(BusinessConfig::with_defaults("acme")));
        let found = config_handler(state, Path("acme".into())).await;
        assert_eq!(found.status(), StatusCode::OK);

        let missing = config_handler(state_with(None), Path("globex".into())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_router_builds() {
        let _router = build_router(Arc::new(InMemoryConfigStore::new()));
    }
}
