//! Display-ready forecast output

use crate::engine::ForecastResult;
use serde::Serialize;
use std::fmt;

/// What the presentation layer shows after a successful forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    /// Product name as entered
    pub product: String,
    /// Target month, e.g. `"December 2024"`
    pub target_period: String,
    /// Forecast rounded to whole units
    pub predicted_value: f64,
    /// Whether the degeneracy re-fit was used
    pub used_fallback: bool,
    /// Whether a negative forecast was shown as zero
    pub clamped_to_zero: bool,
    /// Human-readable notices
    pub notices: Vec<String>,
}

impl ForecastReport {
    /// Build a report for `product`
    pub fn new(result: &ForecastResult, product: &str) -> Self {
        Self {
            product: product.trim().to_string(),
            target_period: result.target_period.long_label(),
            predicted_value: result.predicted_value.round(),
            used_fallback: result.degenerate_fallback_used,
            clamped_to_zero: result.clamped_to_zero,
            notices: result.notices.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let product = if self.product.is_empty() {
            "this product"
        } else {
            self.product.as_str()
        };
        write!(
            f,
            "The predicted sales for {} in {} is {} units.",
            product,
            self.target_period,
            format_units(self.predicted_value)
        )
    }
}

/// Format a unit count with no decimals and comma thousands separators
pub fn format_units(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && digits.chars().any(|c| c != '0') {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
