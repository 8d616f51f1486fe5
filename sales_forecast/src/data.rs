//! Monthly sales data handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Smallest series the forecaster accepts
pub const MIN_OBSERVATIONS: usize = 3;

/// A calendar month, stored as the first day of that month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

impl Month {
    /// Create a month from a year and a 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Month)
            .ok_or_else(|| ForecastError::InvalidDate(format!("{}-{:02}", year, month)))
    }

    /// Month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        // Day 1 always exists, so with_day(1) cannot fail here.
        Month(date.with_day(1).unwrap_or(date))
    }

    /// Parse a month label.
    ///
    /// Accepts `"Jan 2024"`, `"January 2024"`, `"2024-01"`, `"2024-01-15"` and
    /// `"01/2024"`. Whatever the day component, the result is the 1st.
    pub fn parse(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(ForecastError::InvalidDate(label.to_string()));
        }

        let attempts = [
            (format!("01 {}", trimmed), "%d %b %Y"),
            (format!("01 {}", trimmed), "%d %B %Y"),
            (format!("{}-01", trimmed), "%Y-%m-%d"),
            (trimmed.to_string(), "%Y-%m-%d"),
            (format!("01/{}", trimmed), "%d/%m/%Y"),
        ];

        attempts
            .iter()
            .find_map(|(text, format)| NaiveDate::parse_from_str(text, format).ok())
            .map(Month::from_date)
            .ok_or_else(|| ForecastError::InvalidDate(label.to_string()))
    }

    /// The following calendar month
    pub fn succ(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Month)
    }

    /// The preceding calendar month
    pub fn pred(self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Month)
    }

    /// Number of months from `self` forward to `other` (negative if `other` is earlier)
    pub fn months_until(self, other: Month) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }

    /// First day of the month
    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Calendar year
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 1-based month number
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Short label, e.g. `"Jan 2024"`
    pub fn label(self) -> String {
        self.0.format("%b %Y").to_string()
    }

    /// Long label, e.g. `"January 2024"`
    pub fn long_label(self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<String> for Month {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        Month::parse(&value)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.label()
    }
}

/// Sales cell as the user typed it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Numeric input
    Number(f64),
    /// Free text, parsed on demand
    Text(String),
    /// Nothing entered
    #[default]
    Empty,
}

impl RawValue {
    /// The value as a usable sales figure.
    ///
    /// Blank, non-numeric, non-finite, zero and negative inputs all count as
    /// "not provided".
    pub fn as_positive(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Empty => return None,
        };

        (value.is_finite() && value > 0.0).then_some(value)
    }

    /// Whether the cell holds anything at all
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(_) => false,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value.to_string())
        }
    }
}

/// One row of user input: a month label and a sales cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Month label as displayed, e.g. `"Jan 2024"`
    #[serde(alias = "date_str", alias = "date")]
    pub date_label: String,
    /// Sales cell
    #[serde(default, alias = "sales")]
    pub value: RawValue,
}

impl RawEntry {
    /// Create a new entry
    pub fn new(date_label: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            date_label: date_label.into(),
            value: value.into(),
        }
    }
}

/// A single month of sales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesObservation {
    /// Calendar month
    pub month: Month,
    /// Units sold
    pub value: f64,
}

/// Strictly increasing monthly sales series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSeries {
    observations: Vec<SalesObservation>,
}

impl SalesSeries {
    /// Build a series from observations that are already sorted and unique
    pub fn new(observations: Vec<SalesObservation>) -> Result<Self> {
        if observations.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                found: observations.len(),
                required: MIN_OBSERVATIONS,
            });
        }

        for pair in observations.windows(2) {
            if pair[1].month <= pair[0].month {
                return Err(ForecastError::InvalidParameter(format!(
                    "Months must be strictly increasing ({} then {})",
                    pair[0].month, pair[1].month
                )));
            }
        }

        if let Some(bad) = observations
            .iter()
            .find(|obs| !obs.value.is_finite() || obs.value < 0.0)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "Sales for {} must be a non-negative number, got {}",
                bad.month, bad.value
            )));
        }

        Ok(Self { observations })
    }

    /// Convenience constructor from consecutive months starting at `start`
    pub fn from_values(start: Month, values: &[f64]) -> Result<Self> {
        let mut observations = Vec::with_capacity(values.len());
        let mut month = start;
        for (i, &value) in values.iter().enumerate() {
            if i > 0 {
                month = month.succ().ok_or_else(|| {
                    ForecastError::InvalidDate(format!("month after {}", month))
                })?;
            }
            observations.push(SalesObservation { month, value });
        }

        Self::new(observations)
    }

    /// All observations in chronological order
    pub fn observations(&self) -> &[SalesObservation] {
        &self.observations
    }

    /// Sales values in chronological order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.value).collect()
    }

    /// Months in chronological order
    pub fn months(&self) -> Vec<Month> {
        self.observations.iter().map(|obs| obs.month).collect()
    }

    /// Most recent observation
    pub fn last(&self) -> &SalesObservation {
        // The constructor guarantees at least MIN_OBSERVATIONS entries.
        &self.observations[self.observations.len() - 1]
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed series
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Whether every value lies within `tolerance` of the last one
    pub fn is_constant(&self, tolerance: f64) -> bool {
        crate::utils::is_flat(&self.values(), tolerance)
    }

    /// Months between the first and last observation that have no entry
    pub fn missing_months(&self) -> Vec<Month> {
        let mut missing = Vec::new();
        for pair in self.observations.windows(2) {
            let mut month = pair[0].month;
            while let Some(next) = month.succ() {
                if next >= pair[1].month {
                    break;
                }
                missing.push(next);
                month = next;
            }
        }
        missing
    }
}

/// Loader for raw sales rows stored on disk
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load rows from a CSV file with a header row and `date,sales` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let date_label = record.get(0).unwrap_or_default();
            if date_label.is_empty() {
                continue;
            }
            let value = RawValue::from(record.get(1).unwrap_or_default());
            entries.push(RawEntry::new(date_label, value));
        }

        Ok(entries)
    }

    /// Load rows from a JSON file holding an array of entries
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Vec<RawEntry>> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse rows from JSON text
    pub fn from_json_str(text: &str) -> Result<Vec<RawEntry>> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load rows, picking the format from the file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawEntry>> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(path),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::from_csv(path),
            _ => Err(ForecastError::InvalidParameter(format!(
                "Unsupported input file (expected .csv or .json): {}",
                path.display()
            ))),
        }
    }
}
