//! Engine configuration.
//!
//! The defaults reproduce the protocol constants. A configuration can also be
//! loaded from a JSON file and adjusted through `DSC_*` environment variables;
//! whatever the source, [`EngineConfig::validate`] must pass before an engine
//! accepts it.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::health::HealthFactor;
use crate::utils::constants::*;

// ═══════════════════════════════════════════════════════════════════════════════
// ENGINE CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Risk and oracle parameters of an engine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Percentage of collateral value counted toward the health factor
    pub liquidation_threshold: u64,

    /// Extra percentage of seized collateral paid to liquidators
    pub liquidation_bonus: u64,

    /// Denominator for threshold and bonus
    pub liquidation_precision: u64,

    /// Minimum health factor, 18 decimals
    pub min_health_factor: u64,

    /// Fixed-point precision, 18 decimals
    pub precision: u64,

    /// Scale lifting 8-decimal feed answers to 18 decimals
    pub additional_feed_precision: u64,

    /// Maximum age of a feed reading in seconds
    pub oracle_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            liquidation_threshold: LIQUIDATION_THRESHOLD as u64,
            liquidation_bonus: LIQUIDATION_BONUS as u64,
            liquidation_precision: LIQUIDATION_PRECISION as u64,
            min_health_factor: MIN_HEALTH_FACTOR as u64,
            precision: PRECISION as u64,
            additional_feed_precision: ADDITIONAL_FEED_PRECISION as u64,
            oracle_timeout_secs: ORACLE_TIMEOUT_SECS,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Defaults with `DSC_*` environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (`DSC_LIQUIDATION_BONUS`, ...)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut u64); 5] = [
            ("DSC_LIQUIDATION_THRESHOLD", &mut self.liquidation_threshold),
            ("DSC_LIQUIDATION_BONUS", &mut self.liquidation_bonus),
            ("DSC_LIQUIDATION_PRECISION", &mut self.liquidation_precision),
            ("DSC_MIN_HEALTH_FACTOR", &mut self.min_health_factor),
            ("DSC_ORACLE_TIMEOUT_SECS", &mut self.oracle_timeout_secs),
        ];

        for (key, field) in fields {
            if let Some(raw) = lookup(key) {
                *field = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Parse(format!("{}={} is not an integer", key, raw)))?;
            }
        }

        self.validate()
    }

    /// Validate parameters are consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.liquidation_precision == 0 {
            return Err(ConfigError::Validation("liquidation precision must be greater than 0".into()));
        }

        if self.liquidation_threshold == 0 || self.liquidation_threshold > self.liquidation_precision {
            return Err(ConfigError::Validation(format!(
                "liquidation threshold {} must be in 1..={}",
                self.liquidation_threshold, self.liquidation_precision
            )));
        }

        if self.liquidation_bonus >= self.liquidation_precision {
            return Err(ConfigError::Validation(format!(
                "liquidation bonus {} must be below {}",
                self.liquidation_bonus, self.liquidation_precision
            )));
        }

        if self.min_health_factor == 0 {
            return Err(ConfigError::Validation("minimum health factor must be greater than 0".into()));
        }

        // Amounts, USD values and health factors share one 18-decimal scale.
        if u128::from(self.precision) != PRECISION {
            return Err(ConfigError::Validation(format!(
                "precision {} must be {}",
                self.precision, PRECISION
            )));
        }

        let feed_scale = 10u128.pow(u32::from(FEED_DECIMALS));
        if u128::from(self.additional_feed_precision).checked_mul(feed_scale) != Some(PRECISION) {
            return Err(ConfigError::Validation(format!(
                "additional feed precision {} does not lift {}-decimal answers to {}",
                self.additional_feed_precision, FEED_DECIMALS, PRECISION
            )));
        }

        if self.oracle_timeout_secs == 0 {
            return Err(ConfigError::Validation("oracle timeout must be greater than 0".into()));
        }

        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FIXED-POINT ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Liquidation threshold as `U256`
    pub fn threshold(&self) -> U256 {
        U256::from(self.liquidation_threshold)
    }

    /// Liquidation bonus as `U256`
    pub fn bonus(&self) -> U256 {
        U256::from(self.liquidation_bonus)
    }

    /// Liquidation precision as `U256`
    pub fn liquidation_denominator(&self) -> U256 {
        U256::from(self.liquidation_precision)
    }

    /// Fixed-point precision as `U256`
    pub fn precision_u256(&self) -> U256 {
        U256::from(self.precision)
    }

    /// Feed scale as `U256`
    pub fn feed_scale(&self) -> U256 {
        U256::from(self.additional_feed_precision)
    }

    /// Minimum health factor
    pub fn min_health(&self) -> HealthFactor {
        HealthFactor::from_raw(U256::from(self.min_health_factor))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for crate::error::Error {
    fn from(err: ConfigError) -> Self {
        crate::error::Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_matches_protocol_constants() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.liquidation_threshold, 50);
        assert_eq!(config.liquidation_bonus, 10);
        assert_eq!(config.min_health_factor, 1_000_000_000_000_000_000);
        assert_eq!(config.oracle_timeout_secs, 10_800);
    }

    #[test]
    fn test_validation_rejects_bad_threshold() {
        let mut config = EngineConfig::default();
        config.liquidation_threshold = 0;
        assert!(config.validate().is_err());

        config.liquidation_threshold = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inconsistent_precision() {
        let config = EngineConfig { precision: 1_000_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = EngineConfig { additional_feed_precision: 1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_rejects_rescaled_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "precision": 1000000, "additional_feed_precision": 1 }"#).unwrap();

        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = EngineConfig { oracle_timeout_secs: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> =
            [("DSC_ORACLE_TIMEOUT_SECS", "3600"), ("DSC_LIQUIDATION_BONUS", "5")].into();
        let mut config = EngineConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.oracle_timeout_secs, 3600);
        assert_eq!(config.liquidation_bonus, 5);
        assert_eq!(config.liquidation_threshold, 50);
    }

    #[test]
    fn test_override_parse_error() {
        let mut config = EngineConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "DSC_LIQUIDATION_BONUS").then(|| "ten".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("engine.json");

        let config = EngineConfig { oracle_timeout_secs: 600, ..Default::default() };
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "liquidation_bonus": 7 }"#).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.liquidation_bonus, 7);
        assert_eq!(loaded.oracle_timeout_secs, ORACLE_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineConfig::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
