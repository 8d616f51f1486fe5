//! Seasonal ARIMA models for monthly sales forecasting
//!
//! The model is `φ(B) Φ(B^m) (1-B)^d (1-B^m)^D y_t = θ(B) Θ(B^m) ε_t` with no
//! constant term. Coefficients are estimated by conditional sum of squares:
//! pre-sample values and innovations of the differenced series are taken as
//! zero and the squared one-step residuals are minimised with Nelder–Mead.
//! Stationarity and invertibility are not enforced.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ModelOrder, TrainedForecastModel};
use crate::optimizer::{nelder_mead, NelderMeadConfig};
use crate::utils::{difference, difference_poly, lag1_autocorrelation, poly_mul};
use tracing::{debug, trace};

/// Seasonal ARIMA model (unfitted)
#[derive(Debug, Clone)]
pub struct SeasonalArima {
    /// Name of the model
    name: String,
    /// Model orders
    order: ModelOrder,
    /// Optimiser iteration cap
    max_iterations: usize,
    /// Optimiser stopping tolerance
    tolerance: f64,
}

/// Trained seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalArima {
    /// Name of the model
    name: String,
    /// Model orders
    order: ModelOrder,
    /// Estimated coefficients, laid out as [φ.., θ.., Φ.., Θ..]
    params: Vec<f64>,
    /// Expanded AR lag weights on the differenced series (index = lag)
    ar_lags: Vec<f64>,
    /// Expanded MA lag weights on the innovations (index = lag)
    ma_lags: Vec<f64>,
    /// Historical data
    historical_data: Vec<f64>,
    /// Differenced series the coefficients were fitted on
    differenced: Vec<f64>,
    /// Conditional residuals of the differenced series
    residuals: Vec<f64>,
    /// Conditional sum of squares at the optimum
    sse: f64,
    /// Optimiser iterations used
    iterations: usize,
    /// Whether the optimiser met its tolerance
    converged: bool,
}

impl SeasonalArima {
    /// Create a new seasonal ARIMA model
    pub fn new(order: ModelOrder) -> Self {
        Self {
            name: order.to_string(),
            order,
            max_iterations: 200,
            tolerance: 1e-8,
        }
    }

    /// Set the optimiser iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the optimiser stopping tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Model orders
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// Difference the series seasonally, then regularly
    fn differenced(&self, values: &[f64]) -> Vec<f64> {
        let seasonal = difference(values, self.order.seasonal.period, self.order.seasonal.d);
        difference(&seasonal, 1, self.order.d)
    }

    /// Starting point for the optimiser
    fn initial_params(&self, differenced: &[f64]) -> Vec<f64> {
        let mut params = vec![0.0; self.order.param_count()];
        if self.order.p > 0 {
            params[0] = lag1_autocorrelation(differenced);
        }
        params
    }

    /// Conditional sum of squares for a parameter vector
    fn conditional_sse(&self, differenced: &[f64], params: &[f64]) -> f64 {
        let (ar_lags, ma_lags) = expand_lags(&self.order, params);
        let sse: f64 = conditional_residuals(differenced, &ar_lags, &ma_lags)
            .iter()
            .map(|e| e * e)
            .sum();

        if sse.is_finite() {
            sse
        } else {
            f64::INFINITY
        }
    }
}

impl ForecastModel for SeasonalArima {
    type Trained = TrainedSeasonalArima;

    fn train(&self, values: &[f64]) -> Result<TrainedSeasonalArima> {
        self.order.validate()?;

        if values.is_empty() {
            return Err(ForecastError::FitError(
                "Cannot fit a model to an empty series".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::FitError(
                "Series contains non-finite values".to_string(),
            ));
        }

        let differenced = self.differenced(values);
        let param_count = self.order.param_count();

        let (params, sse, iterations, converged) = if differenced.is_empty() || param_count == 0 {
            // Nothing left after differencing: the ARMA part carries no
            // information and the differenced-scale forecast is zero.
            debug!(
                model = %self.name,
                observations = values.len(),
                span = self.order.differencing_span(),
                "series shorter than differencing span, skipping coefficient estimation"
            );
            let params = vec![0.0; param_count];
            let sse = self.conditional_sse(&differenced, &params);
            (params, sse, 0, true)
        } else {
            let init = self.initial_params(&differenced);
            trace!(model = %self.name, ?init, "starting optimiser");
            let result = nelder_mead(
                |p| self.conditional_sse(&differenced, p),
                &init,
                NelderMeadConfig {
                    max_iter: self.max_iterations,
                    tolerance: self.tolerance,
                    ..Default::default()
                },
            );
            (
                result.optimal_point,
                result.optimal_value,
                result.iterations,
                result.converged,
            )
        };

        if !sse.is_finite() {
            return Err(ForecastError::FitError(format!(
                "{}: objective is not finite (values too large or numerically unstable)",
                self.name
            )));
        }
        if params.iter().any(|p| !p.is_finite()) {
            return Err(ForecastError::FitError(format!(
                "{}: estimated coefficients are not finite",
                self.name
            )));
        }

        let (ar_lags, ma_lags) = expand_lags(&self.order, &params);
        let residuals = conditional_residuals(&differenced, &ar_lags, &ma_lags);

        debug!(
            model = %self.name,
            observations = values.len(),
            differenced = differenced.len(),
            ?params,
            sse,
            iterations,
            converged,
            "fitted seasonal ARIMA"
        );

        Ok(TrainedSeasonalArima {
            name: self.name.clone(),
            order: self.order,
            params,
            ar_lags,
            ma_lags,
            historical_data: values.to_vec(),
            differenced,
            residuals,
            sse,
            iterations,
            converged,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalArima {
    /// Model orders
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// Non-seasonal AR coefficients (φ)
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.params[..self.order.p]
    }

    /// Non-seasonal MA coefficients (θ)
    pub fn ma_coefficients(&self) -> &[f64] {
        let start = self.order.p;
        &self.params[start..start + self.order.q]
    }

    /// Seasonal AR coefficients (Φ)
    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        let start = self.order.p + self.order.q;
        &self.params[start..start + self.order.seasonal.p]
    }

    /// Seasonal MA coefficients (Θ)
    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        let start = self.order.p + self.order.q + self.order.seasonal.p;
        &self.params[start..start + self.order.seasonal.q]
    }

    /// Conditional residuals on the differenced scale
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Conditional sum of squares at the optimum
    pub fn sse(&self) -> f64 {
        self.sse
    }

    /// Optimiser iterations used
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the optimiser met its tolerance before the iteration cap
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// One-step forecast of the differenced series
    fn forecast_differenced(&self) -> f64 {
        let n = self.differenced.len();
        let ar: f64 = self
            .ar_lags
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(lag, _)| *lag <= n)
            .map(|(lag, coef)| coef * self.differenced[n - lag])
            .sum();
        let ma: f64 = self
            .ma_lags
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(lag, _)| *lag <= n)
            .map(|(lag, coef)| coef * self.residuals[n - lag])
            .sum();
        ar + ma
    }
}

impl TrainedForecastModel for TrainedSeasonalArima {
    fn forecast_next(&self) -> Result<f64> {
        let first = match self.historical_data.first() {
            Some(&v) => v,
            None => {
                return Err(ForecastError::FitError(
                    "Model has not been fitted to data".to_string(),
                ))
            }
        };

        // Undo (1-B)^d (1-B^m)^D. Levels before the first observation are
        // held at the first observation.
        let integration = poly_mul(
            &difference_poly(1, self.order.d),
            &difference_poly(self.order.seasonal.period, self.order.seasonal.d),
        );
        let n = self.historical_data.len();
        let level_at = |lag: usize| {
            if lag <= n {
                self.historical_data[n - lag]
            } else {
                first
            }
        };

        let carried: f64 = integration
            .iter()
            .enumerate()
            .skip(1)
            .map(|(lag, coef)| coef * level_at(lag))
            .sum();
        let forecast = self.forecast_differenced() - carried;

        if !forecast.is_finite() {
            return Err(ForecastError::FitError(format!(
                "{}: forecast is not finite",
                self.name
            )));
        }

        Ok(forecast)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Multiply out the seasonal and non-seasonal polynomials into lag weights.
///
/// Returns `(ar_lags, ma_lags)` where `w_t = Σ ar_lags[k] w_{t-k} + ε_t + Σ ma_lags[k] ε_{t-k}`.
fn expand_lags(order: &ModelOrder, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let (phi, rest) = params.split_at(order.p);
    let (theta, rest) = rest.split_at(order.q);
    let (seasonal_phi, seasonal_theta) = rest.split_at(order.seasonal.p);
    let period = order.seasonal.period.max(1);

    let lag_poly = |coefs: &[f64], step: usize, sign: f64| {
        let mut poly = vec![0.0; coefs.len() * step + 1];
        poly[0] = 1.0;
        for (i, c) in coefs.iter().enumerate() {
            poly[(i + 1) * step] = sign * c;
        }
        poly
    };

    let ar_poly = poly_mul(&lag_poly(phi, 1, -1.0), &lag_poly(seasonal_phi, period, -1.0));
    let ma_poly = poly_mul(&lag_poly(theta, 1, 1.0), &lag_poly(seasonal_theta, period, 1.0));

    let ar_lags = ar_poly
        .iter()
        .enumerate()
        .map(|(lag, c)| if lag == 0 { 0.0 } else { -c })
        .collect();
    let ma_lags = ma_poly
        .iter()
        .enumerate()
        .map(|(lag, c)| if lag == 0 { 0.0 } else { *c })
        .collect();

    (ar_lags, ma_lags)
}

/// One-step residuals with pre-sample values and innovations set to zero
fn conditional_residuals(differenced: &[f64], ar_lags: &[f64], ma_lags: &[f64]) -> Vec<f64> {
    let mut residuals = Vec::with_capacity(differenced.len());
    for t in 0..differenced.len() {
        let ar: f64 = ar_lags
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(lag, _)| *lag <= t)
            .map(|(lag, coef)| coef * differenced[t - lag])
            .sum();
        let ma: f64 = ma_lags
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(lag, _)| *lag <= t)
            .map(|(lag, coef)| coef * residuals[t - lag])
            .sum();
        residuals.push(differenced[t] - ar - ma);
    }
    residuals
}
