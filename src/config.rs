//! Layered configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `<config_dir>/strategy-lab/config.toml`
//! 3. The file passed with `--config`
//! 4. Environment variables (`STRATEGY_LAB_*`, `__` separates sections,
//!    e.g. `STRATEGY_LAB_WEIGHTS__TAM=0.5`)
//!
//! CLI flags are applied on top by the caller.

use crate::error::ConfigError;
use crate::model::Weights;
use crate::report::View;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const fn default_funnel_step() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LabConfig {
    /// View shown first in the TUI and printed in text/JSON mode.
    #[serde(default)]
    pub view: View,

    #[serde(default)]
    pub weights: Weights,

    /// Initial `+`/`-` step for funnel counts in the TUI.
    #[serde(default = "default_funnel_step")]
    pub funnel_step: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            view: View::default(),
            weights: Weights::default(),
            funnel_step: default_funnel_step(),
        }
    }
}

impl LabConfig {
    /// The user config file is optional; a file passed explicitly must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
        }
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("STRATEGY_LAB_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("strategy-lab").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("weights.tam", self.weights.tam),
            ("weights.adoption", self.weights.adoption),
            ("weights.fit", self.weights.fit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        if self.funnel_step == 0 {
            return Err(ConfigError::InvalidValue {
                field: "funnel_step".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
