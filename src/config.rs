//! Engine-wide numerical settings with environment overrides.
//!
//! | Variable                       | Field                          | Default |
//! |--------------------------------|--------------------------------|---------|
//! | `FERRIC_IV_TOLERANCE`          | `solver.tolerance`             | `1e-6`  |
//! | `FERRIC_IV_VOL_TOLERANCE`      | `solver.vol_tolerance`         | `1e-10` |
//! | `FERRIC_IV_MAX_ITERATIONS`     | `solver.max_iterations`        | `100`   |
//! | `FERRIC_IV_MIN_VOL`            | `solver.min_vol`               | `1e-6`  |
//! | `FERRIC_IV_MAX_VOL`            | `solver.max_vol`               | `5.0`   |
//! | `FERRIC_HIST_WINDOW`           | `historical.window`            | `20`    |
//! | `FERRIC_HIST_PERIODS_PER_YEAR` | `historical.periods_per_year`  | `255`   |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::PricingError;
use crate::vol::historical::HistoricalVolConfig;
use crate::vol::implied::SolverConfig;

/// Aggregated settings for the solver and the historical estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub solver: SolverConfig,
    pub historical: HistoricalVolConfig,
}

impl EngineConfig {
    /// Defaults overridden by any `FERRIC_*` variables set in the process
    /// environment.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] when a variable does not parse or the
    /// resulting settings are out of range.
    pub fn from_env() -> Result<Self, PricingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a caller-supplied lookup.
    ///
    /// # Errors
    /// See [`EngineConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PricingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            solver: SolverConfig {
                tolerance: parse_or(&lookup, "FERRIC_IV_TOLERANCE", defaults.solver.tolerance)?,
                vol_tolerance: parse_or(
                    &lookup,
                    "FERRIC_IV_VOL_TOLERANCE",
                    defaults.solver.vol_tolerance,
                )?,
                max_iterations: parse_or(
                    &lookup,
                    "FERRIC_IV_MAX_ITERATIONS",
                    defaults.solver.max_iterations,
                )?,
                min_vol: parse_or(&lookup, "FERRIC_IV_MIN_VOL", defaults.solver.min_vol)?,
                max_vol: parse_or(&lookup, "FERRIC_IV_MAX_VOL", defaults.solver.max_vol)?,
                min_vega: defaults.solver.min_vega,
            },
            historical: HistoricalVolConfig {
                window: parse_or(&lookup, "FERRIC_HIST_WINDOW", defaults.historical.window)?,
                periods_per_year: parse_or(
                    &lookup,
                    "FERRIC_HIST_PERIODS_PER_YEAR",
                    defaults.historical.periods_per_year,
                )?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Propagates [`SolverConfig::validate`] and [`HistoricalVolConfig::validate`].
    pub fn validate(&self) -> Result<(), PricingError> {
        self.solver.validate()?;
        self.historical.validate()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, PricingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| PricingError::InvalidInput(format!("{key}: {e}"))),
        None => Ok(default),
    }
}
