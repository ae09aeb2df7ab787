//! TOML run configuration with serde defaults and explicit validation.
//!
//! Every setting has a default, so a missing config file is valid. The
//! weight tolerance can also arrive through the `--tolerance` flag, which
//! clap feeds from `PARTCHECK_WEIGHT_TOL_PCT` when the flag is absent.

use std::path::Path;

use partcheck_engine::WeightTolerance;
use partcheck_fetch::FetchConfig;
use serde::Deserialize;

use crate::CliError;

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: Option<FetchConfig>,
    #[serde(default)]
    pub tolerance: Option<WeightTolerance>,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("Konfigurationsdatei {}: {e}", path.display()))
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|e| {
            CliError::config(format!("Konfigurationsdatei {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CliError> {
        if let Some(catalog) = &self.catalog {
            if catalog.base_url.trim().is_empty() {
                return Err(CliError::config("catalog.base_url darf nicht leer sein"));
            }
            if catalog.concurrency == 0 {
                return Err(CliError::config("catalog.concurrency muss mindestens 1 sein"));
            }
        }
        if let Some(tolerance) = &self.tolerance {
            if tolerance.pct < 0.0 {
                return Err(CliError::config("tolerance.pct darf nicht negativ sein"));
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> FetchConfig {
        self.catalog.clone().unwrap_or_default()
    }

    /// Effective tolerance: flag (or its environment fallback) > config
    /// file > strict default.
    pub fn tolerance(&self, flag_pct: Option<f64>) -> Result<WeightTolerance, CliError> {
        if let Some(pct) = flag_pct {
            if pct < 0.0 {
                return Err(CliError::config("Toleranz darf nicht negativ sein"));
            }
            return Ok(WeightTolerance::percent(pct));
        }
        Ok(self.tolerance.unwrap_or_default())
    }
}
