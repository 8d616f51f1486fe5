//! # Sales Forecast Workspace
//!
//! Workspace umbrella crate. Everything lives in [`sales_forecast`]; this crate
//! re-exports it so the workspace root can be depended on directly.
//!
//! ## Example
//!
//! ```
//! use sales_forecast_workspace::sales_forecast::{normalize, RawEntry};
//!
//! let rows = vec![
//!     RawEntry::new("Jan 2024", "10"),
//!     RawEntry::new("Jan 2024", "5"),
//!     RawEntry::new("Feb 2024", "8"),
//!     RawEntry::new("Mar 2024", "9"),
//! ];
//! let normalized = normalize(&rows).unwrap();
//! assert_eq!(normalized.series.values(), vec![15.0, 8.0, 9.0]);
//! ```

pub use sales_forecast;
