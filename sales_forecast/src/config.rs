//! Forecast configuration

use crate::data::MIN_OBSERVATIONS;
use crate::error::{ForecastError, Result};
use crate::models::ModelOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What to do when the history skips months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Model the observations as if they were consecutive and report the gap
    #[default]
    PassThrough,
    /// Refuse to forecast until the missing months are filled in
    Reject,
}

/// Settings for one normalize-then-forecast request.
///
/// The defaults are the production values: order (1,1,1)(1,1,1,12), a
/// 200-iteration optimiser cap and a 1e-6 degeneracy tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Model orders for the first fit
    pub order: ModelOrder,
    /// Optimiser iteration cap per fit
    pub max_iterations: usize,
    /// Optimiser stopping tolerance
    pub optimizer_tolerance: f64,
    /// Absolute tolerance for "forecast equals last value" and "series is constant"
    pub degeneracy_tolerance: f64,
    /// Fewest usable observations accepted
    pub min_observations: usize,
    /// Cap on the differencing order used by the fallback re-fit
    pub max_fallback_d: usize,
    /// Handling of skipped months
    pub gap_policy: GapPolicy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: ModelOrder::monthly(),
            max_iterations: 200,
            optimizer_tolerance: 1e-8,
            degeneracy_tolerance: 1e-6,
            min_observations: MIN_OBSERVATIONS,
            max_fallback_d: ModelOrder::MAX_D,
            gap_policy: GapPolicy::PassThrough,
        }
    }
}

impl ForecastConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set the gap policy
    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    /// Differencing order the fallback re-fit uses
    pub fn fallback_d(&self) -> usize {
        (self.order.d + 1).min(self.max_fallback_d)
    }

    /// Check every setting is usable
    pub fn validate(&self) -> Result<()> {
        self.order.validate()?;

        if self.max_iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_iterations must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("optimizer_tolerance", self.optimizer_tolerance),
            ("degeneracy_tolerance", self.degeneracy_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.min_observations < MIN_OBSERVATIONS {
            return Err(ForecastError::InvalidParameter(format!(
                "min_observations must be at least {}, got {}",
                MIN_OBSERVATIONS, self.min_observations
            )));
        }
        if self.max_fallback_d > ModelOrder::MAX_D || self.max_fallback_d < self.order.d {
            return Err(ForecastError::InvalidParameter(format!(
                "max_fallback_d must be between {} and {}, got {}",
                self.order.d,
                ModelOrder::MAX_D,
                self.max_fallback_d
            )));
        }
        Ok(())
    }
}
