//! Editable sales table owned by the presentation layer.
//!
//! The table is plain state: the UI keeps one per session, mutates it in
//! response to user actions and hands `entries()` to the forecaster by value.

use crate::data::{Month, RawEntry, RawValue};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Rows a table always keeps
pub const MIN_ROWS: usize = 3;

/// One editable row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    /// Month shown on the row
    pub month: Month,
    /// Sales cell
    pub sales: RawValue,
}

/// Session table of (month, sales) rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    rows: Vec<SalesRow>,
}

impl SalesTable {
    /// Three blank rows for consecutive months starting at `start`
    pub fn new(start: Month) -> Result<Self> {
        Ok(Self {
            rows: blank_rows(start, MIN_ROWS)?,
        })
    }

    /// Rows in display order
    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true: a table keeps at least [`MIN_ROWS`] rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a blank row for the month after the last row
    pub fn add_row(&mut self) -> Result<Month> {
        let last = self
            .rows
            .last()
            .map(|row| row.month)
            .ok_or_else(|| ForecastError::InvalidParameter("Table has no rows".to_string()))?;
        let month = next_month(last)?;
        self.rows.push(SalesRow {
            month,
            sales: RawValue::Empty,
        });
        Ok(month)
    }

    /// Remove a row; refused once only [`MIN_ROWS`] remain
    pub fn remove_row(&mut self, index: usize) -> Result<SalesRow> {
        self.check_index(index)?;
        if self.rows.len() <= MIN_ROWS {
            return Err(ForecastError::InvalidParameter(format!(
                "The table must keep at least {} rows",
                MIN_ROWS
            )));
        }
        Ok(self.rows.remove(index))
    }

    /// Set the sales cell of a row
    pub fn set_sales(&mut self, index: usize, sales: impl Into<RawValue>) -> Result<()> {
        self.check_index(index)?;
        self.rows[index].sales = sales.into();
        Ok(())
    }

    /// Relabel every row consecutively from `start`, keeping sales cells
    pub fn set_start_month(&mut self, start: Month) -> Result<()> {
        let mut month = start;
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i > 0 {
                month = next_month(month)?;
            }
            row.month = month;
        }
        Ok(())
    }

    /// Parse `label` and relabel from it
    pub fn set_start_label(&mut self, label: &str) -> Result<()> {
        let start = Month::parse(label)?;
        self.set_start_month(start)
    }

    /// Reset to three blank rows starting at `start`
    pub fn clear(&mut self, start: Month) -> Result<()> {
        self.rows = blank_rows(start, MIN_ROWS)?;
        Ok(())
    }

    /// Rows holding a positive numeric sales figure
    pub fn valid_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.sales.as_positive().is_some())
            .count()
    }

    /// Snapshot handed to the forecaster
    pub fn entries(&self) -> Vec<RawEntry> {
        self.rows
            .iter()
            .map(|row| RawEntry {
                date_label: row.month.label(),
                value: row.sales.clone(),
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Row {} does not exist (table has {} rows)",
                index,
                self.rows.len()
            )));
        }
        Ok(())
    }
}

/// Month labels offered for the first row, newest first
pub fn date_options(now: Month, count: usize) -> Vec<String> {
    let mut options = Vec::with_capacity(count);
    let mut month = Some(now);
    while let Some(current) = month {
        if options.len() == count {
            break;
        }
        options.push(current.label());
        month = current.pred();
    }
    options
}

fn next_month(month: Month) -> Result<Month> {
    month
        .succ()
        .ok_or_else(|| ForecastError::InvalidDate(format!("no month follows {}", month)))
}

fn blank_rows(start: Month, count: usize) -> Result<Vec<SalesRow>> {
    let mut rows = Vec::with_capacity(count);
    let mut month = start;
    for i in 0..count {
        if i > 0 {
            month = next_month(month)?;
        }
        rows.push(SalesRow {
            month,
            sales: RawValue::Empty,
        });
    }
    Ok(rows)
}
