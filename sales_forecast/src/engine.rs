//! Forecast engine: fit, degeneracy fallback and result assembly

use crate::config::ForecastConfig;
use crate::data::{Month, SalesSeries};
use crate::error::{ForecastError, Notice, Result};
use crate::models::sarima::SeasonalArima;
use crate::models::{ForecastModel, ModelOrder, TrainedForecastModel};
use serde::Serialize;
use tracing::{info, warn};

/// One-step-ahead forecast for the month after the series ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Month being forecast (first of the month after the last observation)
    pub target_period: Month,
    /// Point forecast, never negative
    pub predicted_value: f64,
    /// Whether the degeneracy re-fit produced the value
    pub degenerate_fallback_used: bool,
    /// Whether a negative forecast was raised to zero
    pub clamped_to_zero: bool,
    /// Order of the fit that produced `predicted_value`
    pub order_used: ModelOrder,
    /// Non-fatal notices from normalization and forecasting
    pub notices: Vec<Notice>,
}

/// Fits the seasonal model and produces a single forecast.
///
/// Holds only configuration; every call builds its own model, so one engine
/// can serve any number of requests.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }
}

impl ForecastEngine {
    /// Create an engine after validating the configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the month after `series` ends.
    ///
    /// `product_label` is used for logging only.
    pub fn forecast(&self, series: &SalesSeries, product_label: &str) -> Result<ForecastResult> {
        let values = series.values();
        let last = *series.last();
        let target_period = last.month.succ().ok_or_else(|| {
            ForecastError::InvalidDate(format!("no month follows {}", last.month))
        })?;

        let order = self.config.order;
        let tolerance = self.config.degeneracy_tolerance;
        let baseline = self.fit_and_predict(order, &values)?;

        let degenerate =
            (baseline - last.value).abs() <= tolerance && !series.is_constant(tolerance);

        let (raw, order_used) = if degenerate {
            let fallback_order = order.with_d(self.config.fallback_d());
            warn!(
                product = product_label,
                baseline,
                last = last.value,
                fallback = %fallback_order,
                "forecast repeats the last observation, re-fitting with more differencing"
            );
            let value = if fallback_order == order {
                baseline
            } else {
                self.fit_and_predict(fallback_order, &values)?
            };
            (value, fallback_order)
        } else {
            (baseline, order)
        };

        let mut notices = Vec::new();
        let clamped_to_zero = raw < 0.0;
        let predicted_value = if clamped_to_zero {
            warn!(product = product_label, raw, "negative forecast clamped to zero");
            notices.push(Notice::NegativeForecastClamped { raw });
            0.0
        } else {
            raw
        };

        info!(
            product = product_label,
            observations = series.len(),
            target = %target_period,
            predicted_value,
            fallback = degenerate,
            "forecast complete"
        );

        Ok(ForecastResult {
            target_period,
            predicted_value,
            degenerate_fallback_used: degenerate,
            clamped_to_zero,
            order_used,
            notices,
        })
    }

    /// Fit one model and forecast one step. Every failure becomes a `FitError`.
    fn fit_and_predict(&self, order: ModelOrder, values: &[f64]) -> Result<f64> {
        let model = SeasonalArima::new(order)
            .with_max_iterations(self.config.max_iterations)
            .with_tolerance(self.config.optimizer_tolerance);

        let trained = model.train(values).map_err(into_fit_error)?;
        if !trained.converged() {
            warn!(
                model = model.name(),
                iterations = trained.iterations(),
                "optimiser hit its iteration cap, using best estimate"
            );
        }

        trained.forecast_next().map_err(into_fit_error)
    }
}

fn into_fit_error(err: ForecastError) -> ForecastError {
    match err {
        ForecastError::FitError(_) => err,
        other => ForecastError::FitError(other.to_string()),
    }
}

/// Forecast with the default engine
pub fn forecast(series: &SalesSeries, product_label: &str) -> Result<ForecastResult> {
    ForecastEngine::default().forecast(series, product_label)
}
