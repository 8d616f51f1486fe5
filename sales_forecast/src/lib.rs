//! # Sales Forecast
//!
//! One-step-ahead forecasting of monthly product sales.
//!
//! ## Features
//!
//! - Normalization of user-edited (month, sales) rows into a clean monthly series
//! - Seasonal ARIMA (1,1,1)(1,1,1,12) fit by conditional sum of squares
//! - Re-fit with extra differencing when the forecast just repeats the last value
//! - Editable session table and display-ready reports
//!
//! ## Quick Start
//!
//! ```rust
//! use sales_forecast::{run_forecast, ForecastConfig, ForecastReport, RawEntry};
//!
//! let rows = vec![
//!     RawEntry::new("Jan 2024", "120"),
//!     RawEntry::new("Feb 2024", 135.0),
//!     RawEntry::new("Mar 2024", "150"),
//! ];
//!
//! let result = run_forecast(&rows, "Paracetamol", &ForecastConfig::default()).unwrap();
//! assert_eq!(result.target_period.long_label(), "April 2024");
//! assert!(result.predicted_value >= 0.0);
//!
//! println!("{}", ForecastReport::new(&result, "Paracetamol"));
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod optimizer;
pub mod report;
pub mod table;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{ForecastConfig, GapPolicy};
pub use crate::data::{DataLoader, Month, RawEntry, RawValue, SalesObservation, SalesSeries};
pub use crate::engine::{ForecastEngine, ForecastResult};
pub use crate::error::{ForecastError, Notice, Result};
pub use crate::models::{ForecastModel, ModelOrder, SeasonalOrder, TrainedForecastModel};
pub use crate::normalize::{normalize, Normalized, Normalizer};
pub use crate::report::ForecastReport;
pub use crate::table::SalesTable;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Normalize `entries` and forecast the following month.
///
/// The configuration is validated first, then the rows are normalized (fails
/// fast on bad input), then the model is fitted. Normalizer notices come
/// before engine notices in the result.
pub fn run_forecast(
    entries: &[RawEntry],
    product_label: &str,
    config: &ForecastConfig,
) -> Result<ForecastResult> {
    let engine = ForecastEngine::new(config.clone())?;
    let normalized = Normalizer::new(config).normalize(entries)?;

    let mut result = engine.forecast(&normalized.series, product_label)?;
    let mut notices = normalized.notices;
    notices.append(&mut result.notices);
    result.notices = notices;

    Ok(result)
}
