//! Forecasting models for monthly sales series

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Seasonal part of a SARIMA order: (P, D, Q, m)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal AR order (P)
    pub p: usize,
    /// Seasonal differencing order (D)
    pub d: usize,
    /// Seasonal MA order (Q)
    pub q: usize,
    /// Season length in observations (m)
    pub period: usize,
}

/// Full SARIMA order: (p, d, q)(P, D, Q, m)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
    /// Seasonal order
    pub seasonal: SeasonalOrder,
}

impl ModelOrder {
    /// Highest differencing order the model supports
    pub const MAX_D: usize = 2;

    /// The fixed monthly order (1,1,1)(1,1,1,12)
    pub const fn monthly() -> Self {
        Self {
            p: 1,
            d: 1,
            q: 1,
            seasonal: SeasonalOrder {
                p: 1,
                d: 1,
                q: 1,
                period: 12,
            },
        }
    }

    /// Same order with a different non-seasonal differencing order
    pub fn with_d(self, d: usize) -> Self {
        Self { d, ..self }
    }

    /// Number of estimated coefficients
    pub fn param_count(&self) -> usize {
        self.p + self.q + self.seasonal.p + self.seasonal.q
    }

    /// Observations consumed by differencing
    pub fn differencing_span(&self) -> usize {
        self.d + self.seasonal.d * self.seasonal.period
    }

    /// Check the orders are ones the fitter can handle
    pub fn validate(&self) -> Result<()> {
        if self.d > Self::MAX_D {
            return Err(ForecastError::InvalidParameter(format!(
                "Differencing order must be <= {}, got {}",
                Self::MAX_D,
                self.d
            )));
        }
        if self.seasonal.d > Self::MAX_D {
            return Err(ForecastError::InvalidParameter(format!(
                "Seasonal differencing order must be <= {}, got {}",
                Self::MAX_D,
                self.seasonal.d
            )));
        }
        if self.p > 3 || self.q > 3 || self.seasonal.p > 3 || self.seasonal.q > 3 {
            return Err(ForecastError::InvalidParameter(format!(
                "AR/MA orders must be <= 3, got {}",
                self
            )));
        }
        let seasonal_terms = self.seasonal.p + self.seasonal.d + self.seasonal.q;
        if seasonal_terms > 0 && self.seasonal.period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "Seasonal period must be >= 2, got {}",
                self.seasonal.period
            )));
        }
        Ok(())
    }
}

impl Default for ModelOrder {
    fn default() -> Self {
        Self::monthly()
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{},{})",
            self.p,
            self.d,
            self.q,
            self.seasonal.p,
            self.seasonal.d,
            self.seasonal.q,
            self.seasonal.period
        )
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Conditional mean of the next observation
    fn forecast_next(&self) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a value sequence
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on chronologically ordered values
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod sarima;
