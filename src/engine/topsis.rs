//! TOPSIS ranking over a decision matrix.
//!
//! The pipeline runs in a fixed order: weight the columns, extract the ideal and
//! anti-ideal points, measure Euclidean distances to both, then score each alternative
//! by its relative closeness `d- / (d+ + d-)`.

use super::matrix::DecisionMatrix;
use crate::error::{RankError, Result};
use serde::Serialize;

/// Direction in which a criterion column improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Higher is better: the ideal is the column maximum.
    Benefit,
    /// Lower is better: the ideal is the column minimum.
    Cost,
}

impl Impact {
    pub const ALL: [Impact; 2] = [Impact::Benefit, Impact::Cost];

    pub fn name(self) -> &'static str {
        match self {
            Impact::Benefit => "benefit",
            Impact::Cost => "cost",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopsisEngine {
    matrix: Vec<Vec<f64>>,
    alternatives: Vec<String>,
    weights: Vec<f64>,
    impacts: Vec<Impact>,
}

impl TopsisEngine {
    /// Validates shapes up front; nothing is computed until [`TopsisEngine::topsis`].
    pub fn new(matrix: &DecisionMatrix, weights: Vec<f64>, impacts: Vec<Impact>) -> Result<Self> {
        let rows = matrix.rows();
        let cols = matrix.cols();
        if rows == 0 || cols == 0 {
            return Err(RankError::Dimension(format!(
                "decision matrix must be non-empty, got {rows}x{cols}"
            )));
        }
        if let Some(row) = matrix.values().iter().position(|row| row.len() != cols) {
            return Err(RankError::Dimension(format!(
                "decision matrix row {row} has {} columns, expected {cols}",
                matrix.values()[row].len()
            )));
        }
        if weights.len() != cols {
            return Err(RankError::Dimension(format!(
                "{} weights supplied for {cols} criteria",
                weights.len()
            )));
        }
        if impacts.len() != cols {
            return Err(RankError::Dimension(format!(
                "{} impacts supplied for {cols} criteria",
                impacts.len()
            )));
        }

        Ok(Self {
            matrix: matrix.values().to_vec(),
            alternatives: matrix.alternatives().to_vec(),
            weights,
            impacts,
        })
    }

    /// Runs the full pipeline and returns the read-only result.
    pub fn topsis(&self) -> TopsisState {
        let weighted_matrix = self.weighted_matrix();
        let (ideal, anti_ideal) = self.extremes(&weighted_matrix);

        let distances = weighted_matrix
            .iter()
            .map(|row| [euclidean(row, &ideal), euclidean(row, &anti_ideal)])
            .collect::<Vec<_>>();

        let closeness = distances
            .iter()
            .map(|&[to_ideal, to_anti_ideal]| {
                let total = to_ideal + to_anti_ideal;
                if total == 0.0 {
                    0.0
                } else {
                    to_anti_ideal / total
                }
            })
            .collect();

        TopsisState {
            alternatives: self.alternatives.clone(),
            weighted_matrix,
            ideal,
            anti_ideal,
            distances,
            closeness,
        }
    }

    fn weighted_matrix(&self) -> Vec<Vec<f64>> {
        self.matrix
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.weights)
                    .map(|(value, weight)| value * weight)
                    .collect()
            })
            .collect()
    }

    fn extremes(&self, weighted: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
        self.impacts
            .iter()
            .enumerate()
            .map(|(col, impact)| {
                let column = weighted.iter().map(|row| row[col]);
                let max = column.clone().fold(f64::NEG_INFINITY, f64::max);
                let min = column.fold(f64::INFINITY, f64::min);
                match impact {
                    Impact::Benefit => (max, min),
                    Impact::Cost => (min, max),
                }
            })
            .unzip()
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// Everything `topsis()` derives from the decision matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopsisState {
    alternatives: Vec<String>,
    weighted_matrix: Vec<Vec<f64>>,
    ideal: Vec<f64>,
    anti_ideal: Vec<f64>,
    distances: Vec<[f64; 2]>,
    closeness: Vec<f64>,
}

impl TopsisState {
    pub fn weighted_matrix(&self) -> &[Vec<f64>] {
        &self.weighted_matrix
    }

    pub fn ideal(&self) -> &[f64] {
        &self.ideal
    }

    pub fn anti_ideal(&self) -> &[f64] {
        &self.anti_ideal
    }

    /// `[distance to ideal, distance to anti-ideal]` per alternative.
    pub fn distances(&self) -> &[[f64; 2]] {
        &self.distances
    }

    pub fn closeness(&self) -> &[f64] {
        &self.closeness
    }

    /// 1-based rank per alternative; rank 1 has the highest closeness and ties go to
    /// the alternative listed first. An undefined (NaN) closeness ranks last.
    pub fn ranking(&self) -> Vec<usize> {
        let key = |index: usize| {
            let value = self.closeness[index];
            if value.is_nan() {
                f64::NEG_INFINITY
            } else {
                value
            }
        };
        let mut order = (0..self.closeness.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| key(b).total_cmp(&key(a)));

        let mut ranks = vec![0; order.len()];
        for (position, index) in order.into_iter().enumerate() {
            ranks[index] = position + 1;
        }
        ranks
    }

    pub fn coefficient_for(&self, alternative: &str) -> Option<f64> {
        self.alternatives
            .iter()
            .position(|label| label == alternative)
            .map(|index| self.closeness[index])
    }
}
