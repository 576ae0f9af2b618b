//! Process settings read from the environment.
//!
//! A `.env` file in the working directory is loaded first if present;
//! real environment variables take precedence over it.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CONFIG_DIR: &str = "business_configs";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP API binds to (`PAYROLL_BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// Directory of business configuration JSON files
    /// (`PAYROLL_CONFIG_DIR`).
    pub config_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_vars(
            env::var("PAYROLL_BIND_ADDR").ok(),
            env::var("PAYROLL_CONFIG_DIR").ok(),
        )
    }

    fn from_vars(bind_addr: Option<String>, config_dir: Option<String>) -> Result<Self> {
        let bind_addr = bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid PAYROLL_BIND_ADDR '{bind_addr}'"))?;
        let config_dir = config_dir.unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
        Ok(Self {
            bind_addr,
            config_dir: PathBuf::from(config_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset() {
        let settings = Settings::from_vars(None, None).unwrap();
        assert_eq!(settings.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.config_dir, PathBuf::from(DEFAULT_CONFIG_DIR));
    }

    #[test]
    fn test_bad_bind_addr_is_an_error() {
        let err = Settings::from_vars(Some("not-an-addr".into()), None).unwrap_err();
        assert!(err.to_string().contains("PAYROLL_BIND_ADDR"));
    }
}
