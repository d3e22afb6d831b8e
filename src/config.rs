//! Oracle configuration.
//!
//! [`OracleConfig`] holds the knobs shared by every scenario. All fields have
//! defaults; override them from TOML or environment variables.
//!
//! # Environment Variable Overrides
//!
//! | Variable                     | Field                        | Default |
//! |------------------------------|------------------------------|---------|
//! | `CLUMP_ORACLE_TOLERANCE`     | `default_relative_tolerance` | `1e-4`  |
//! | `CLUMP_ORACLE_DATA_DIR`      | `dataset_root`               | unset   |
//! | `CLUMP_ORACLE_RUN_EXTERNAL`  | `run_external`               | `false` |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::oracle::tolerance::is_valid_tolerance;

/// Failure to load or build a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document did not parse.
    #[error("invalid oracle configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A relative tolerance was zero, negative or non-finite.
    #[error("invalid oracle configuration: relative tolerance must be finite and positive, got {value}")]
    InvalidTolerance {
        /// The rejected value.
        value: f64,
    },
}

/// Settings shared across validation scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Relative tolerance for quality-score comparisons that do not set their own.
    /// Default: 1e-4.
    pub default_relative_tolerance: f64,

    /// Directory that external dataset paths are resolved against.
    /// Default: unset.
    pub dataset_root: Option<PathBuf>,

    /// Run external-dataset scenarios when their data is available.
    /// Default: false.
    pub run_external: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            default_relative_tolerance: 1e-4,
            dataset_root: None,
            run_external: false,
        }
    }
}

impl OracleConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_tolerance(self.default_relative_tolerance) {
            return Err(ConfigError::InvalidTolerance {
                value: self.default_relative_tolerance,
            });
        }
        Ok(())
    }

    /// Apply environment overrides.
    ///
    /// Only variables that are set are applied; unparseable values are
    /// logged and ignored.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = var("CLUMP_ORACLE_TOLERANCE") {
            match val.parse::<f64>() {
                Ok(t) if is_valid_tolerance(t) => self.default_relative_tolerance = t,
                _ => tracing::warn!(value = %val, "ignoring CLUMP_ORACLE_TOLERANCE"),
            }
        }
        if let Some(val) = var("CLUMP_ORACLE_DATA_DIR") {
            if !val.is_empty() {
                self.dataset_root = Some(PathBuf::from(val));
            }
        }
        if let Some(val) = var("CLUMP_ORACLE_RUN_EXTERNAL") {
            match val.as_str() {
                "true" | "1" => self.run_external = true,
                "false" | "0" => self.run_external = false,
                _ => tracing::warn!(value = %val, "ignoring CLUMP_ORACLE_RUN_EXTERNAL"),
            }
        }
        self
    }

    /// Set the default relative tolerance.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTolerance`] unless `tolerance` is finite and positive.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self, ConfigError> {
        if !is_valid_tolerance(tolerance) {
            return Err(ConfigError::InvalidTolerance { value: tolerance });
        }
        self.default_relative_tolerance = tolerance;
        Ok(self)
    }

    /// Set the dataset root and enable external scenarios.
    #[must_use]
    pub fn with_dataset_root(mut self, root: impl AsRef<Path>) -> Self {
        self.dataset_root = Some(root.as_ref().to_path_buf());
        self.run_external = true;
        self
    }

    /// Resolve a dataset path, or `None` when external scenarios are disabled.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        if !self.run_external {
            return None;
        }
        self.dataset_root.as_ref().map(|root| root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let c = OracleConfig::default();
        assert_eq!(c.default_relative_tolerance, 1e-4);
        assert!(c.resolve("mnist.csv").is_none());
    }

    #[test]
    fn toml_keeps_missing_defaults() {
        let c = OracleConfig::from_toml_str("default_relative_tolerance = 0.001").unwrap();
        assert_eq!(c.default_relative_tolerance, 1e-3);
        assert!(!c.run_external);

        let c = OracleConfig::from_toml_str(
            "dataset_root = \"/data\"\nrun_external = true\n",
        )
        .unwrap();
        assert_eq!(c.resolve("a/b.csv"), Some(PathBuf::from("/data/a/b.csv")));

        assert!(matches!(
            OracleConfig::from_toml_str("run_external = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_rejects_unusable_tolerance() {
        for doc in [
            "default_relative_tolerance = -1.0",
            "default_relative_tolerance = 0.0",
            "default_relative_tolerance = nan",
            "default_relative_tolerance = inf",
        ] {
            assert!(
                matches!(
                    OracleConfig::from_toml_str(doc),
                    Err(ConfigError::InvalidTolerance { .. })
                ),
                "{doc}"
            );
        }
    }

    #[test]
    fn builder_rejects_unusable_tolerance() {
        assert!(OracleConfig::default().with_tolerance(-1.0).is_err());
        assert!(OracleConfig::default().with_tolerance(f64::NAN).is_err());
        let c = OracleConfig::default().with_tolerance(1e-3).unwrap();
        assert_eq!(c.default_relative_tolerance, 1e-3);
    }

    #[test]
    fn bad_run_external_override_keeps_toml_value() {
        let from_toml = OracleConfig::from_toml_str("run_external = true").unwrap();
        for bad in ["TRUE", "yes", "ture", ""] {
            let c = from_toml
                .clone()
                .with_overrides(|k| (k == "CLUMP_ORACLE_RUN_EXTERNAL").then(|| bad.to_string()));
            assert!(c.run_external, "override {bad:?}");
        }

        let c = from_toml
            .clone()
            .with_overrides(|k| (k == "CLUMP_ORACLE_RUN_EXTERNAL").then(|| "0".to_string()));
        assert!(!c.run_external);
        let c = OracleConfig::default()
            .with_overrides(|k| (k == "CLUMP_ORACLE_RUN_EXTERNAL").then(|| "true".to_string()));
        assert!(c.run_external);
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("CLUMP_ORACLE_TOLERANCE", "not-a-number"),
            ("CLUMP_ORACLE_DATA_DIR", "/srv/workloads"),
            ("CLUMP_ORACLE_RUN_EXTERNAL", "1"),
        ]
        .into_iter()
        .collect();
        let c = OracleConfig::default()
            .with_overrides(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(c.default_relative_tolerance, 1e-4);
        assert_eq!(c.dataset_root, Some(PathBuf::from("/srv/workloads")));
        assert!(c.run_external);

        let c = OracleConfig::default()
            .with_overrides(|k| (k == "CLUMP_ORACLE_TOLERANCE").then(|| "0.05".to_string()));
        assert_eq!(c.default_relative_tolerance, 0.05);
    }
}
