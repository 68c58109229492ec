pub mod csv;
pub mod json;

use crate::error::{RankError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

pub const VERSION_FIELD: &str = "version";
pub const START_DATE_FIELD: &str = "start_date";
pub const NEXT_RELEASE: &str = "Next Release";

/// One version's worth of metrics before the dataset is put into column form.
#[derive(Debug, Clone)]
pub struct VersionRow {
    pub version: String,
    pub start_date: Option<DateTime<Utc>>,
    pub values: BTreeMap<String, f64>,
}

/// Per-version metrics in column form, rows ordered by version start date ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsDataset {
    versions: Vec<String>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl MetricsDataset {
    /// Builds a dataset from rows. Dated rows are stably sorted by start date and come
    /// before undated rows; a metric missing from a row reads as `0.0`.
    pub fn from_rows(mut rows: Vec<VersionRow>) -> Self {
        rows.sort_by(|a, b| match (a.start_date, b.start_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in &rows {
            for name in row.values.keys() {
                columns.entry(name.clone()).or_default();
            }
        }
        for (name, column) in columns.iter_mut() {
            column.extend(
                rows.iter()
                    .map(|row| row.values.get(name).copied().unwrap_or(0.0)),
            );
        }

        Self {
            versions: rows.into_iter().map(|row| row.version).collect(),
            columns,
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        json::parse_rows(content).map(Self::from_rows)
    }

    pub fn from_csv_str(content: &str) -> Result<Self> {
        csv::parse_rows(content).map(Self::from_rows)
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Value of `column` on the pending "Next Release" row, if the dataset has one.
    pub fn next_release_value(&self, column: &str) -> Option<f64> {
        let index = self
            .versions
            .iter()
            .position(|version| version == NEXT_RELEASE)?;
        self.column(column)?.get(index).copied()
    }

    /// Keeps only rows whose version is in `include` (when non-empty) and not in `exclude`.
    pub fn filter_versions(self, include: &[String], exclude: &[String]) -> Self {
        let keep = self
            .versions
            .iter()
            .map(|version| {
                (include.is_empty() || include.contains(version)) && !exclude.contains(version)
            })
            .collect::<Vec<_>>();

        let retain = |values: Vec<f64>| {
            values
                .into_iter()
                .zip(&keep)
                .filter_map(|(value, keep)| keep.then_some(value))
                .collect::<Vec<_>>()
        };

        let versions = self
            .versions
            .into_iter()
            .zip(&keep)
            .filter_map(|(version, keep)| keep.then_some(version))
            .collect();
        let columns = self
            .columns
            .into_iter()
            .map(|(name, values)| (name, retain(values)))
            .collect();

        Self { versions, columns }
    }
}

/// Loads a dataset file, choosing the parser from the extension.
pub fn load_dataset(path: &Path) -> Result<MetricsDataset> {
    if !path.exists() {
        return Err(RankError::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let dataset = match extension.as_deref() {
        Some("json") => MetricsDataset::from_json_str(&content),
        Some("csv") => MetricsDataset::from_csv_str(&content),
        _ => Err(RankError::DatasetParse(format!(
            "{}: unsupported dataset format (expected .json or .csv)",
            path.display()
        ))),
    }?;
    tracing::debug!(
        path = %path.display(),
        versions = dataset.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` and plain `YYYY-MM-DD`.
pub(crate) fn parse_start_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| RankError::DatasetParse(format!("invalid start date: {raw}")))
}
