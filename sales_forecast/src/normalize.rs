//! Series normalizer: raw table rows to a clean monthly series

use crate::config::{ForecastConfig, GapPolicy};
use crate::data::{Month, RawEntry, SalesObservation, SalesSeries, MIN_OBSERVATIONS};
use crate::error::{ForecastError, Notice, Result};
use tracing::{debug, warn};

/// A validated series plus any non-fatal notices raised while building it
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// The clean series
    pub series: SalesSeries,
    /// Duplicate and gap notices
    pub notices: Vec<Notice>,
}

/// Validates and reshapes raw rows
#[derive(Debug, Clone)]
pub struct Normalizer {
    min_observations: usize,
    gap_policy: GapPolicy,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            min_observations: MIN_OBSERVATIONS,
            gap_policy: GapPolicy::PassThrough,
        }
    }
}

impl Normalizer {
    /// Create a normalizer using the request configuration
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            min_observations: config.min_observations.max(MIN_OBSERVATIONS),
            gap_policy: config.gap_policy,
        }
    }

    /// Turn raw rows into a strictly increasing monthly series.
    ///
    /// Rows without a positive numeric value are dropped before anything
    /// else, so a bad date on an empty row is never reported.
    pub fn normalize(&self, entries: &[RawEntry]) -> Result<Normalized> {
        let usable: Vec<(&str, f64)> = entries
            .iter()
            .filter_map(|entry| {
                entry
                    .value
                    .as_positive()
                    .map(|value| (entry.date_label.as_str(), value))
            })
            .collect();

        debug!(
            rows = entries.len(),
            usable = usable.len(),
            "filtered raw sales rows"
        );
        self.check_count(usable.len())?;

        let mut dated = usable
            .into_iter()
            .map(|(label, value)| Month::parse(label).map(|month| SalesObservation { month, value }))
            .collect::<Result<Vec<_>>>()?;
        dated.sort_by_key(|obs| obs.month);

        let mut notices = Vec::new();
        let mut observations: Vec<SalesObservation> = Vec::with_capacity(dated.len());
        let mut duplicated: Vec<Month> = Vec::new();
        for obs in dated {
            match observations.last_mut() {
                Some(last) if last.month == obs.month => {
                    last.value += obs.value;
                    if duplicated.last() != Some(&obs.month) {
                        duplicated.push(obs.month);
                    }
                }
                _ => observations.push(obs),
            }
        }

        if !duplicated.is_empty() {
            warn!(months = ?duplicated, "duplicate months aggregated by summing");
            notices.push(Notice::DuplicatesAggregated { months: duplicated });
        }

        self.check_count(observations.len())?;
        let series = SalesSeries::new(observations)?;

        let missing = series.missing_months();
        if !missing.is_empty() {
            match self.gap_policy {
                GapPolicy::Reject => {
                    return Err(ForecastError::MonthGap {
                        missing: missing.iter().map(|m| m.label()).collect(),
                    })
                }
                GapPolicy::PassThrough => {
                    warn!(missing = missing.len(), "series skips months, modelling as consecutive");
                    notices.push(Notice::GapsPassedThrough { missing });
                }
            }
        }

        Ok(Normalized { series, notices })
    }

    fn check_count(&self, found: usize) -> Result<()> {
        if found < self.min_observations {
            return Err(ForecastError::InsufficientData {
                found,
                required: self.min_observations,
            });
        }
        Ok(())
    }
}

/// Normalize with the default settings
pub fn normalize(entries: &[RawEntry]) -> Result<Normalized> {
    Normalizer::default().normalize(entries)
}
