use crate::engine::correlation::CorrelationMethod;
use crate::engine::matrix::DecisionMatrix;
use crate::engine::topsis::{Impact, TopsisState};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CriterionSummary {
    pub name: String,
    pub weight: f64,
    pub direction: Impact,
}

/// One ranked alternative. `weight` is the closeness share of the total and is NaN
/// for every alternative when the total closeness is zero.
#[derive(Debug, Clone, Serialize)]
pub struct AlternativeScore {
    pub name: String,
    pub closeness: f64,
    pub weight: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankReport {
    pub project: String,
    pub versions: Vec<String>,
    pub correlation_method: CorrelationMethod,
    pub criteria: Vec<CriterionSummary>,
    pub alternatives: Vec<AlternativeScore>,
    pub decision_matrix: DecisionMatrix,
    pub topsis: TopsisState,
}

impl RankReport {
    pub fn weight_of(&self, alternative: &str) -> Option<f64> {
        self.alternatives
            .iter()
            .find(|score| score.name == alternative)
            .map(|score| score.weight)
    }

    /// True when no alternative could be weighted (total closeness was zero).
    pub fn is_degenerate(&self) -> bool {
        self.alternatives.iter().all(|score| score.weight.is_nan())
    }

    /// Alternatives sorted by rank, best first.
    pub fn ranked(&self) -> Vec<&AlternativeScore> {
        let mut ranked = self.alternatives.iter().collect::<Vec<_>>();
        ranked.sort_by_key(|score| score.rank);
        ranked
    }
}
