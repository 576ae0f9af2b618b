//! Business payroll configuration.
//!
//! Each business configures its own tax brackets, allowances and custom
//! deductions.  The engine receives a fully resolved [`BusinessConfig`]
//! and never looks configuration up itself; retrieval goes through a
//! [`ConfigStore`] supplied by the caller.

use crate::error::PayrollError;
use crate::models::{AllowanceRule, CustomDeductionRule, TaxBracket};
use crate::tax::{BracketSchedule, PERSONAL_RELIEF};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::{info, warn};

/// Payroll rules for a single business.
///
/// Every field other than `business_id` is optional in the serialised
/// form:
///
/// * `tax_brackets`: empty, meaning the default PAYE schedule
/// * `personal_relief`: [`PERSONAL_RELIEF`]
/// * `allowances` / `custom_deductions`: empty
/// * `deduct_custom_from_net`: `false`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessConfig {
    pub business_id: String,
    #[serde(default)]
    pub tax_brackets: Vec<TaxBracket>,
    #[serde(default = "default_relief")]
    pub personal_relief: f64,
    #[serde(default)]
    pub allowances: Vec<AllowanceRule>,
    #[serde(default)]
    pub custom_deductions: Vec<CustomDeductionRule>,
    /// Whether business-wide custom deductions reduce net salary.  They
    /// are always listed and counted in the deductions total.
    #[serde(default)]
    pub deduct_custom_from_net: bool,
}

fn default_relief() -> f64 {
    PERSONAL_RELIEF
}

impl BusinessConfig {
    /// A configuration with every default applied.
    pub fn with_defaults(business_id: impl Into<String>) -> Self {
        Self {
            business_id: business_id.into(),
            tax_brackets: Vec::new(),
            personal_relief: PERSONAL_RELIEF,
            allowances: Vec::new(),
            custom_deductions: Vec::new(),
            deduct_custom_from_net: false,
        }
    }

    /// Resolves the configured brackets, falling back to the default
    /// schedule when they are missing or malformed.
    pub fn schedule(&self) -> BracketSchedule {
        BracketSchedule::new(&self.tax_brackets, self.personal_relief)
    }
}

/// Source of business configurations.
///
/// Implementations must be thread-safe because the HTTP layer shares a
/// single store across requests.
pub trait ConfigStore: Send + Sync {
    /// Returns the configuration for `business_id`, or `None` if the
    /// business has not configured payroll.
    fn business_config(&self, business_id: &str) -> Result<Option<BusinessConfig>, PayrollError>;
}

/// A [`ConfigStore`] holding configurations in memory.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    configs: RwLock<HashMap<String, BusinessConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the configuration for `config.business_id`.
    pub fn insert(&self, config: BusinessConfig) -> Result<(), PayrollError> {
        let mut configs = self
            .configs
            .write()
            .map_err(|err| PayrollError::ConfigStore(err.to_string()))?;
        configs.insert(config.business_id.clone(), config);
        Ok(())
    }

    /// Builds a store from every configuration file in `path`.
    pub fn load_dir(path: &Path) -> Result<Self> {
        let store = Self::new();
        let configs = load_business_configs_from_dir(path)?;
        info!(count = configs.len(), dir = %path.display(), "loaded business configurations");
        for config in configs {
            store.insert(config)?;
        }
        Ok(store)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn business_config(&self, business_id: &str) -> Result<Option<BusinessConfig>, PayrollError> {
        let configs = self
            .configs
            .read()
            .map_err(|err| PayrollError::ConfigStore(err.to_string()))?;
        Ok(configs.get(business_id).cloned())
    }
}

/// Load all business configurations from a directory.
///
/// This helper scans a directory and attempts to parse any `.json`
/// files as [`BusinessConfig`] objects.  Files that fail to parse are
/// logged and skipped.  A missing directory yields no configurations.
/// Duplicate business IDs are not checked; the last file read wins when
/// loaded into a store.
pub fn load_business_configs_from_dir(path: &Path) -> Result<Vec<BusinessConfig>> {
    let mut configs = Vec::new();
    if !path.is_dir() {
        warn!(dir = %path.display(), "configuration directory not found");
        return Ok(configs);
    }
    let entries = std::fs::read_dir(path)
        .with_context(|| format!("reading configuration directory {}", path.display()))?;
    for entry in entries {
        let entry = entry?;
        let file = entry.path();
        if !entry.file_type()?.is_file() || file.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let data = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        match serde_json::from_str::<BusinessConfig>(&data) {
            Ok(config) => configs.push(config),
            Err(err) => warn!(file = %file.display(), %err, "skipping unparseable business configuration"),
        }
    }
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("payroll-engine-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_minimal_config_takes_defaults() {
        let config: BusinessConfig = serde_json::from_value(json!({"business_id": "acme"})).unwrap();
        assert_eq!(config, BusinessConfig::with_defaults("acme"));
        assert_eq!(config.schedule(), BracketSchedule::default());
    }

    #[test]
    fn test_full_config_parses() {
        let config: BusinessConfig = serde_json::from_value(json!({
            "business_id": "acme",
            "tax_brackets": [
                {"lower_bound": 0.0, "upper_bound": 10000.0, "rate": 10.0},
                {"lower_bound": 10000.0, "rate": 20.0, "enabled": true}
            ],
            "personal_relief": 0.0,
            "allowances": [{"name": "Housing", "type": "percentage", "value": 15.0}],
            "custom_deductions": [{"name": "Welfare", "type": "fixed", "value": 200.0, "enabled": false}],
            "deduct_custom_from_net": true
        }))
        .unwrap();
        assert_eq!(config.tax_brackets[1].upper_bound, None);
        assert_eq!(config.allowances[0].kind, RuleKind::Percentage);
        assert!(!config.custom_deductions[0].enabled);
        assert_eq!(config.schedule().relief(), 0.0);
        assert!(config.deduct_custom_from_net);
    }

    #[test]
    fn test_store_returns_inserted_config() {
        let store = InMemoryConfigStore::new();
        store.insert(BusinessConfig::with_defaults("acme")).unwrap();
        assert!(store.business_config("acme").unwrap().is_some());
        assert!(store.business_config("globex").unwrap().is_none());
    }

    #[test]
    fn test_loads_json_files_and_skips_the_rest() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("acme.json"), r#"{"business_id": "acme"}"#).unwrap();
        std::fs::write(dir.join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let store = InMemoryConfigStore::load_dir(&dir).unwrap();
        assert!(store.business_config("acme").unwrap().is_some());
        assert_eq!(load_business_configs_from_dir(&dir).unwrap().len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir_yields_empty_store() {
        let dir = std::env::temp_dir().join("payroll-engine-does-not-exist");
        assert!(load_business_configs_from_dir(&dir).unwrap().is_empty());
    }
}
