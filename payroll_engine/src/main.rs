//! Entry point for the Payroll Engine binary.
//!
//! Running this binary will start an HTTP server that exposes a
//! minimal API for running payroll.  The directory containing business
//! configuration JSON files may be specified via the
//! `PAYROLL_CONFIG_DIR` environment variable; if unset the server looks
//! for a `business_configs` folder relative to the current working
//! directory.  Log verbosity follows `RUST_LOG` (default `info`).

use payroll_engine::settings::Settings;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::from_env()?;
    payroll_engine::api::serve(settings).await
}
