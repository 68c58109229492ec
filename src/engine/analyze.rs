use super::correlation::CorrelationMethod;
use super::matrix::DecisionMatrixBuilder;
use super::registry::{parse_alternatives, parse_criteria, AlternativeKind, CriterionKind};
use super::topsis::TopsisEngine;
use crate::dataset::MetricsDataset;
use crate::error::Result;
use crate::types::report::{AlternativeScore, CriterionSummary, RankReport};
use tracing::{debug, info, warn};

/// Names, weights and correlation method for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub criteria: Vec<String>,
    pub weights: Vec<f64>,
    pub alternatives: Vec<String>,
    pub method: CorrelationMethod,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            criteria: CriterionKind::ALL
                .iter()
                .map(|kind| kind.name().to_string())
                .collect(),
            weights: vec![1.0; CriterionKind::ALL.len()],
            alternatives: AlternativeKind::ALL
                .iter()
                .map(|kind| kind.name().to_string())
                .collect(),
            method: CorrelationMethod::default(),
        }
    }
}

/// Closeness shares of the total. A zero total leaves every share undefined (NaN).
pub fn normalized_weights(closeness: &[f64]) -> Vec<f64> {
    let total: f64 = closeness.iter().sum();
    if total == 0.0 {
        return vec![f64::NAN; closeness.len()];
    }
    closeness.iter().map(|value| value / total).collect()
}

/// Resolves the request, builds the decision matrix from the dataset and ranks the
/// alternatives. Name and weight errors surface before any series is read.
pub fn analyze(
    project: &str,
    dataset: &MetricsDataset,
    request: &AnalysisRequest,
) -> Result<RankReport> {
    let criteria = parse_criteria(&request.criteria, &request.weights)?;
    let alternatives = parse_alternatives(&request.alternatives)?;
    let criterion_names = criteria.iter().map(|c| c.name()).collect::<Vec<_>>();
    let alternative_names = alternatives.iter().map(|a| a.name()).collect::<Vec<_>>();
    debug!(
        criteria = ?criterion_names,
        alternatives = ?alternative_names,
        method = %request.method,
        "resolved analysis request"
    );

    let mut builder = DecisionMatrixBuilder::new().with_correlation_method(request.method);
    for criterion in &criteria {
        builder.add_criteria(&criterion.series(dataset)?, criterion.name());
    }
    for alternative in &alternatives {
        builder.add_alternative(&alternative.series(dataset)?, alternative.name());
    }
    for label in builder.constant_alternatives() {
        warn!(alternative = label, "series is constant; correlation treated as 0");
    }

    let matrix = builder.build()?;
    debug!(matrix = ?matrix.values(), "decision matrix built");

    let engine = TopsisEngine::new(
        &matrix,
        criteria.iter().map(|criterion| criterion.weight()).collect(),
        criteria.iter().map(|criterion| criterion.direction()).collect(),
    )?;
    let state = engine.topsis();
    let ranking = state.ranking();
    let weights = normalized_weights(state.closeness());
    if weights.iter().all(|weight| weight.is_nan()) {
        warn!(project, "total closeness is zero; alternative weights are undefined");
    }

    let scores = matrix
        .alternatives()
        .iter()
        .enumerate()
        .map(|(index, name)| AlternativeScore {
            name: name.clone(),
            closeness: state.coefficient_for(name).unwrap_or(f64::NAN),
            weight: weights[index],
            rank: ranking[index],
        })
        .collect::<Vec<_>>();

    if let Some(best) = scores.iter().find(|score| score.rank == 1) {
        info!(project, best = %best.name, closeness = best.closeness, "ranking complete");
    }

    Ok(RankReport {
        project: project.to_string(),
        versions: dataset.versions().to_vec(),
        correlation_method: request.method,
        criteria: criteria
            .iter()
            .map(|criterion| CriterionSummary {
                name: criterion.name().to_string(),
                weight: criterion.weight(),
                direction: criterion.direction(),
            })
            .collect(),
        alternatives: scores,
        decision_matrix: matrix,
        topsis: state,
    })
}
