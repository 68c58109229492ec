//! Closed vocabulary of criteria and alternatives, and the parsers that resolve
//! configured names against it.
//!
//! Each kind knows the configuration name users write and the dataset column the
//! metrics collector exports for it.

use super::topsis::Impact;
use crate::dataset::MetricsDataset;
use crate::error::{RankError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Bugs,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 1] = [CriterionKind::Bugs];

    pub fn name(self) -> &'static str {
        match self {
            CriterionKind::Bugs => "bugs",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            CriterionKind::Bugs => "bugs",
        }
    }

    /// Bugs are maximized toward the ideal so the winning alternative is the one most
    /// associated with rising bug counts.
    pub fn direction(self) -> Impact {
        match self {
            CriterionKind::Bugs => Impact::Benefit,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeKind {
    BugVelocity,
    Changes,
    TeamXp,
    Complexity,
    CodeChurn,
    LegacyFiles,
}

impl AlternativeKind {
    pub const ALL: [AlternativeKind; 6] = [
        AlternativeKind::BugVelocity,
        AlternativeKind::Changes,
        AlternativeKind::TeamXp,
        AlternativeKind::Complexity,
        AlternativeKind::CodeChurn,
        AlternativeKind::LegacyFiles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlternativeKind::BugVelocity => "bug_velocity",
            AlternativeKind::Changes => "changes",
            AlternativeKind::TeamXp => "team_xp",
            AlternativeKind::Complexity => "complexity",
            AlternativeKind::CodeChurn => "code_churn",
            AlternativeKind::LegacyFiles => "legacy_files",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            AlternativeKind::BugVelocity => "bug_velocity",
            AlternativeKind::Changes => "changes",
            AlternativeKind::TeamXp => "avg_team_xp",
            AlternativeKind::Complexity => "lizard_avg_complexity",
            AlternativeKind::CodeChurn => "code_churn_avg",
            AlternativeKind::LegacyFiles => "nb_legacy_files",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

fn extract_column(dataset: &MetricsDataset, column: &str) -> Result<Vec<f64>> {
    dataset
        .column(column)
        .map(<[f64]>::to_vec)
        .ok_or_else(|| RankError::MissingColumn(column.to_string()))
}

/// A criterion with its weight attached. The weight is fixed at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    kind: CriterionKind,
    weight: f64,
}

impl Criterion {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn direction(&self) -> Impact {
        self.kind.direction()
    }

    pub fn series(&self, dataset: &MetricsDataset) -> Result<Vec<f64>> {
        extract_column(dataset, self.kind.column())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    kind: AlternativeKind,
}

impl Alternative {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn series(&self, dataset: &MetricsDataset) -> Result<Vec<f64>> {
        extract_column(dataset, self.kind.column())
    }
}

/// Resolves criterion names and attaches weights positionally. Extra weights are ignored.
pub fn parse_criteria<S: AsRef<str>>(names: &[S], weights: &[f64]) -> Result<Vec<Criterion>> {
    if names.is_empty() {
        return Err(RankError::NoCriteriaProvided);
    }

    let resolved = names
        .iter()
        .map(|name| CriterionKind::from_name(name.as_ref()))
        .collect::<Vec<_>>();
    let invalid = unresolved_names(names, &resolved);
    if !invalid.is_empty() {
        return Err(RankError::InvalidCriterion(invalid));
    }

    if weights.len() < names.len() {
        return Err(RankError::MissingWeight {
            expected: names.len(),
            found: weights.len(),
        });
    }

    Ok(resolved
        .into_iter()
        .flatten()
        .zip(weights)
        .map(|(kind, &weight)| Criterion { kind, weight })
        .collect())
}

pub fn parse_alternatives<S: AsRef<str>>(names: &[S]) -> Result<Vec<Alternative>> {
    if names.is_empty() {
        return Err(RankError::NoAlternativeProvided);
    }

    let resolved = names
        .iter()
        .map(|name| AlternativeKind::from_name(name.as_ref()))
        .collect::<Vec<_>>();
    let invalid = unresolved_names(names, &resolved);
    if !invalid.is_empty() {
        return Err(RankError::InvalidAlternative(invalid));
    }

    Ok(resolved
        .into_iter()
        .flatten()
        .map(|kind| Alternative { kind })
        .collect())
}

fn unresolved_names<S: AsRef<str>, T>(names: &[S], resolved: &[Option<T>]) -> Vec<String> {
    names
        .iter()
        .zip(resolved)
        .filter(|(_, kind)| kind.is_none())
        .map(|(name, _)| name.as_ref().to_string())
        .collect()
}
