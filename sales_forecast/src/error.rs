//! Error types for the sales_forecast crate

use crate::data::Month;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few usable (positive, numeric, dated) observations
    #[error("Please enter at least {required} valid sales data points (found {found}).")]
    InsufficientData {
        /// Usable observations that survived filtering
        found: usize,
        /// Minimum required
        required: usize,
    },

    /// A date label could not be read as a calendar month
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// The series skips months and the gap policy rejects that
    #[error("Sales history skips {} month(s): {}", .missing.len(), .missing.join(", "))]
    MonthGap {
        /// Labels of the skipped months
        missing: Vec<String>,
    },

    /// The seasonal model failed to fit or forecast
    #[error("Error in SARIMA modeling: {0}")]
    FitError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while reading JSON or CSV input
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ForecastError {
    /// Short category name, suitable for a UI badge or a log field
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::InsufficientData { .. } => "InsufficientData",
            ForecastError::InvalidDate(_) => "InvalidDate",
            ForecastError::MonthGap { .. } => "MonthGap",
            ForecastError::FitError(_) => "FitError",
            ForecastError::InvalidParameter(_) => "InvalidParameter",
            ForecastError::IoError(_) => "IoError",
            ForecastError::ParseError(_) => "ParseError",
        }
    }

    /// Whether the user can fix this by editing the input and retrying
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ForecastError::IoError(_))
    }
}

/// Non-fatal condition reported alongside a successful result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Several rows named the same month and were summed
    DuplicatesAggregated {
        /// Months that had more than one row
        months: Vec<Month>,
    },
    /// The series skips months and was modelled as if consecutive
    GapsPassedThrough {
        /// Months with no row between the first and last observation
        missing: Vec<Month>,
    },
    /// The model produced a negative figure, shown as zero
    NegativeForecastClamped {
        /// Forecast before clamping
        raw: f64,
    },
}

fn join_months(months: &[Month]) -> String {
    months
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DuplicatesAggregated { months } => write!(
                f,
                "Duplicate dates found. Aggregating sales for duplicate dates ({}).",
                join_months(months)
            ),
            Notice::GapsPassedThrough { missing } => write!(
                f,
                "Sales history skips {} month(s) ({}); they are modelled as if consecutive.",
                missing.len(),
                join_months(missing)
            ),
            Notice::NegativeForecastClamped { raw } => write!(
                f,
                "The model forecast a negative value ({:.2}); showing 0 instead.",
                raw
            ),
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}
