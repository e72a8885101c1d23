use crate::types::ImportRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Exact-match filter over records. `None` on a dimension means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        *self == RecordFilter::default()
    }

    pub fn matches(&self, r: &ImportRecord) -> bool {
        self.year.map_or(true, |y| r.year == y)
            && self.month.map_or(true, |m| r.month == m)
            && self.brand.as_deref().map_or(true, |b| r.brand == b)
            && self.model.as_deref().map_or(true, |m| r.model == m)
            && self
                .vehicle_type
                .as_deref()
                .map_or(true, |t| r.vehicle_type == t)
    }

    /// Matching records, input order preserved.
    pub fn apply(&self, records: &[ImportRecord]) -> Vec<ImportRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Distinct values available for each filter dimension, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    pub brands: Vec<String>,
    pub models: Vec<String>,
    pub vehicle_types: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[ImportRecord]) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let months: BTreeSet<u32> = records.iter().map(|r| r.month).collect();
        let brands: BTreeSet<&str> = records.iter().map(|r| r.brand.as_str()).collect();
        let models: BTreeSet<&str> = records.iter().map(|r| r.model.as_str()).collect();
        let types: BTreeSet<&str> = records.iter().map(|r| r.vehicle_type.as_str()).collect();
        Self {
            years: years.into_iter().collect(),
            months: months.into_iter().collect(),
            brands: brands.into_iter().map(String::from).collect(),
            models: models.into_iter().map(String::from).collect(),
            vehicle_types: types.into_iter().map(String::from).collect(),
        }
    }
}

/// Most recent `(year, month)` present in the records.
pub fn latest_period(records: &[ImportRecord]) -> Option<(i32, u32)> {
    records.iter().map(|r| (r.year, r.month)).max()
}

/// Where a resolved reference period came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSource {
    Configured,
    Latest,
    /// One half configured, the other taken from the latest data.
    Mixed,
}

/// Fill whatever part of the reference period is not configured from
/// `latest`. `None` when something is missing and there is no data.
pub fn resolve_period(
    year: Option<i32>,
    month: Option<u32>,
    latest: Option<(i32, u32)>,
) -> Option<((i32, u32), PeriodSource)> {
    match (year, month) {
        (Some(y), Some(m)) => Some(((y, m), PeriodSource::Configured)),
        (None, None) => latest.map(|p| (p, PeriodSource::Latest)),
        (y, m) => {
            let (ly, lm) = latest?;
            Some(((y.unwrap_or(ly), m.unwrap_or(lm)), PeriodSource::Mixed))
        }
    }
}
