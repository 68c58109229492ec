//! Correlation-based decision matrix.
//!
//! Rows are alternatives, columns are criteria, and each cell holds the correlation
//! between the two normalized series. A pair involving a constant series has no
//! defined correlation and is recorded as `0.0` (no relationship).

use super::correlation::{has_variance, CorrelationMethod};
use super::normalize::normalize;
use crate::error::{RankError, Result};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct LabeledSeries {
    label: String,
    values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionMatrix {
    values: Vec<Vec<f64>>,
    criteria: Vec<String>,
    alternatives: Vec<String>,
    #[serde(skip)]
    criteria_index: HashMap<String, usize>,
    #[serde(skip)]
    alternatives_index: HashMap<String, usize>,
}

impl DecisionMatrix {
    /// Wraps precomputed values, labelling rows and columns by position.
    #[cfg(test)]
    pub fn from_values(values: Vec<Vec<f64>>) -> Self {
        let columns = values.first().map_or(0, Vec::len);
        let criteria = (0..columns).map(|j| format!("c{j}")).collect::<Vec<_>>();
        let alternatives = (0..values.len()).map(|i| format!("a{i}")).collect::<Vec<_>>();
        Self {
            criteria_index: index_of(&criteria),
            alternatives_index: index_of(&alternatives),
            values,
            criteria,
            alternatives,
        }
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn rows(&self) -> usize {
        self.values.len()
    }

    pub fn cols(&self) -> usize {
        self.criteria.len()
    }

    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    pub fn criterion_position(&self, label: &str) -> Option<usize> {
        self.criteria_index.get(label).copied()
    }

    pub fn alternative_position(&self, label: &str) -> Option<usize> {
        self.alternatives_index.get(label).copied()
    }

    pub fn get(&self, alternative: &str, criterion: &str) -> Option<f64> {
        let row = self.alternative_position(alternative)?;
        let col = self.criterion_position(criterion)?;
        self.values.get(row).and_then(|row| row.get(col)).copied()
    }
}

fn index_of(labels: &[String]) -> HashMap<String, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(position, label)| (label.clone(), position))
        .collect()
}

/// Accumulates normalized criterion and alternative series in call order.
#[derive(Debug, Clone, Default)]
pub struct DecisionMatrixBuilder {
    criteria: Vec<LabeledSeries>,
    alternatives: Vec<LabeledSeries>,
    method: CorrelationMethod,
}

impl DecisionMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_method(mut self, method: CorrelationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn add_criteria(&mut self, series: &[f64], label: impl Into<String>) -> &mut Self {
        self.criteria.push(LabeledSeries {
            label: label.into(),
            values: normalize(series),
        });
        self
    }

    pub fn add_alternative(&mut self, series: &[f64], label: impl Into<String>) -> &mut Self {
        self.alternatives.push(LabeledSeries {
            label: label.into(),
            values: normalize(series),
        });
        self
    }

    /// Label of every alternative whose series is constant across versions.
    pub fn constant_alternatives(&self) -> Vec<&str> {
        self.alternatives
            .iter()
            .filter(|series| !has_variance(&series.values))
            .map(|series| series.label.as_str())
            .collect()
    }

    pub fn build(self) -> Result<DecisionMatrix> {
        if self.criteria.is_empty() || self.alternatives.is_empty() {
            return Err(RankError::EmptyDecisionMatrix {
                criteria: self.criteria.len(),
                alternatives: self.alternatives.len(),
            });
        }

        let expected = self.criteria[0].values.len();
        for series in self.criteria.iter().chain(&self.alternatives) {
            if series.values.len() != expected {
                return Err(RankError::SeriesLengthMismatch {
                    label: series.label.clone(),
                    expected,
                    found: series.values.len(),
                });
            }
        }

        let criteria = unique_labels(&self.criteria)?;
        let alternatives = unique_labels(&self.alternatives)?;

        let values = self
            .alternatives
            .iter()
            .map(|alternative| {
                self.criteria
                    .iter()
                    .map(|criterion| {
                        if has_variance(&alternative.values) && has_variance(&criterion.values) {
                            self.method
                                .coefficient(&alternative.values, &criterion.values)
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(DecisionMatrix {
            criteria_index: index_of(&criteria),
            alternatives_index: index_of(&alternatives),
            values,
            criteria,
            alternatives,
        })
    }
}

fn unique_labels(series: &[LabeledSeries]) -> Result<Vec<String>> {
    let mut labels = Vec::with_capacity(series.len());
    for entry in series {
        if labels.contains(&entry.label) {
            return Err(RankError::DuplicateLabel(entry.label.clone()));
        }
        labels.push(entry.label.clone());
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_correlates_every_alternative_with_every_criterion() {
        let mut builder = DecisionMatrixBuilder::new();
        builder
            .add_criteria(&[1.0, 2.0, 3.0, 4.0], "bugs")
            .add_alternative(&[2.0, 4.0, 6.0, 8.0], "changes")
            .add_alternative(&[8.0, 6.0, 4.0, 2.0], "team_xp");

        let matrix = builder.build().expect("matrix should build");

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 1);
        assert!((matrix.values()[0][0] - 1.0).abs() < 1e-9);
        assert!((matrix.values()[1][0] + 1.0).abs() < 1e-9);
        assert_eq!(matrix.alternative_position("team_xp"), Some(1));
        assert_eq!(matrix.criterion_position("bugs"), Some(0));
    }

    #[test]
    fn constant_series_yield_zero_correlation() {
        let mut builder = DecisionMatrixBuilder::new();
        builder
            .add_criteria(&[1.0, 2.0, 3.0], "bugs")
            .add_alternative(&[5.0, 5.0, 5.0], "legacy_files")
            .add_alternative(&[0.0, 0.0, 0.0], "changes");

        assert_eq!(builder.constant_alternatives(), vec!["legacy_files", "changes"]);
        let matrix = builder.build().expect("matrix should build");
        assert_eq!(matrix.values(), &[vec![0.0], vec![0.0]]);
    }

    #[test]
    fn single_version_dataset_degenerates_to_zeros() {
        let mut builder = DecisionMatrixBuilder::new();
        builder
            .add_criteria(&[3.0], "bugs")
            .add_alternative(&[7.0], "changes");
        let matrix = builder.build().expect("matrix should build");
        assert_eq!(matrix.get("changes", "bugs"), Some(0.0));
    }

    #[test]
    fn correlation_method_is_applied() {
        let mut builder =
            DecisionMatrixBuilder::new().with_correlation_method(CorrelationMethod::Spearman);
        builder
            .add_criteria(&[1.0, 2.0, 3.0, 4.0], "bugs")
            .add_alternative(&[1.0, 4.0, 9.0, 100.0], "changes");
        let matrix = builder.build().expect("matrix should build");
        assert!((matrix.values()[0][0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn build_requires_criteria_and_alternatives() {
        let mut builder = DecisionMatrixBuilder::new();
        builder.add_alternative(&[1.0, 2.0], "changes");
        let err = builder.build().expect_err("no criteria should fail");
        assert!(matches!(
            err,
            RankError::EmptyDecisionMatrix {
                criteria: 0,
                alternatives: 1
            }
        ));

        let mut builder = DecisionMatrixBuilder::new();
        builder.add_criteria(&[1.0, 2.0], "bugs");
        assert!(builder.build().is_err());
    }

    #[test]
    fn build_rejects_misaligned_series() {
        let mut builder = DecisionMatrixBuilder::new();
        builder
            .add_criteria(&[1.0, 2.0, 3.0], "bugs")
            .add_alternative(&[1.0, 2.0], "changes");
        let err = builder.build().expect_err("length mismatch should fail");
        assert!(err.to_string().contains("'changes' has 2 values, expected 3"));
    }

    #[test]
    fn build_rejects_duplicate_labels() {
        let mut builder = DecisionMatrixBuilder::new();
        builder
            .add_criteria(&[1.0, 2.0], "bugs")
            .add_alternative(&[1.0, 2.0], "changes")
            .add_alternative(&[2.0, 1.0], "changes");
        let err = builder.build().expect_err("duplicate label should fail");
        assert!(matches!(err, RankError::DuplicateLabel(label) if label == "changes"));
    }

    #[test]
    fn from_values_labels_by_position() {
        let matrix = DecisionMatrix::from_values(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 2);
        assert_eq!(matrix.get("a1", "c0"), Some(3.0));
    }
}
