//! Classifier configuration.

use std::{env, fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::face::expression::ExpressionParams;

/// Environment variable holding the path of a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "NEXUS_CONFIG";

/// Parameters of all classifiers.
///
/// Missing fields take their default values, so a configuration file only needs to list the
/// parameters it changes:
///
/// ```json
/// { "expression": { "smile_threshold": 2.5 }, "metrics": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub expression: ExpressionParams,
    /// Include the [`ExpressionMetrics`] of every face in the output of the `nexus-vision` binary.
    ///
    /// [`ExpressionMetrics`]: crate::face::expression::ExpressionMetrics
    pub metrics: bool,
}

impl Config {
    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    /// Loads the configuration file named by `NEXUS_CONFIG`, or returns the default configuration
    /// if the variable is unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::debug!("loading config from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        let p = &self.expression;
        for (name, value) in [
            ("smile_threshold", p.smile_threshold),
            ("surprise_threshold", p.surprise_threshold),
            ("mouth_openness_threshold", p.mouth_openness_threshold),
            ("neutral_range", p.neutral_range),
            ("min_confidence", p.min_confidence),
        ] {
            anyhow::ensure!(value.is_finite(), "`{name}` must be finite, got {value}");
        }
        anyhow::ensure!(
            (0.0..=1.0).contains(&p.min_confidence),
            "`min_confidence` must be in range 0.0 to 1.0, got {}",
            p.min_confidence
        );
        Ok(())
    }
}
