pub mod csv;
pub mod json;
pub mod md;

use crate::error::{RankError, Result};
use crate::types::report::RankReport;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
    Csv,
}

pub fn render(report: &RankReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(RankError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
        OutputFormat::Csv => Ok(csv::to_csv(report)),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::dataset::MetricsDataset;
    use crate::engine::analyze::{analyze, AnalysisRequest};
    use crate::types::report::RankReport;

    pub fn report() -> RankReport {
        let dataset = MetricsDataset::from_csv_str(
            "version,bugs,bug_velocity,changes,avg_team_xp\n\
             v1,1,2,10,9\n\
             v2,3,5,8,7\n\
             v3,2,4,12,8\n\
             v4,6,9,9,3\n",
        )
        .expect("dataset should parse");
        let request = AnalysisRequest {
            alternatives: vec![
                "team_xp".to_string(),
                "bug_velocity".to_string(),
                "changes".to_string(),
            ],
            ..AnalysisRequest::default()
        };
        analyze("demo", &dataset, &request).expect("analysis should succeed")
    }

    pub fn degenerate_report() -> RankReport {
        let dataset = MetricsDataset::from_csv_str("version,bugs,changes\nv1,3,7\n")
            .expect("dataset should parse");
        let request = AnalysisRequest {
            alternatives: vec!["changes".to_string()],
            ..AnalysisRequest::default()
        };
        analyze("fresh", &dataset, &request).expect("analysis should succeed")
    }
}
