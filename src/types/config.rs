use crate::engine::analyze::AnalysisRequest;
use crate::engine::correlation::CorrelationMethod;
use crate::error::RankError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RankConfig {
    pub project: ProjectConfig,
    pub topsis: Option<TopsisConfig>,
    pub versions: Option<VersionsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Dataset file relative to the config directory.
    pub dataset: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopsisConfig {
    pub criteria: Option<Vec<String>>,
    pub weights: Option<Vec<f64>>,
    pub alternatives: Option<Vec<String>>,
    pub corr_method: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionsConfig {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
}

impl RankConfig {
    pub fn excluded_versions(&self) -> &[String] {
        self.versions
            .as_ref()
            .map(|versions| versions.exclude.as_slice())
            .unwrap_or_default()
    }

    pub fn included_versions(&self) -> &[String] {
        self.versions
            .as_ref()
            .map(|versions| versions.include.as_slice())
            .unwrap_or_default()
    }

    pub fn correlation_method(&self) -> Result<CorrelationMethod, RankError> {
        match self
            .topsis
            .as_ref()
            .and_then(|topsis| topsis.corr_method.as_deref())
        {
            Some(name) => CorrelationMethod::from_name(name),
            None => Ok(CorrelationMethod::default()),
        }
    }

    /// Analysis request from the `[topsis]` table; unset keys fall back to the
    /// defaults of [`AnalysisRequest`].
    pub fn request(&self) -> Result<AnalysisRequest, RankError> {
        let defaults = AnalysisRequest::default();
        let topsis = self.topsis.clone().unwrap_or_default();
        Ok(AnalysisRequest {
            criteria: topsis.criteria.unwrap_or(defaults.criteria),
            weights: topsis.weights.unwrap_or(defaults.weights),
            alternatives: topsis.alternatives.unwrap_or(defaults.alternatives),
            method: self.correlation_method()?,
        })
    }

    pub fn validate(&self) -> Result<(), RankError> {
        if self.project.name.trim().is_empty() {
            return Err(RankError::ConfigParse(
                "project.name must not be empty".to_string(),
            ));
        }

        self.correlation_method()?;

        if let Some(weights) = self.topsis.as_ref().and_then(|topsis| topsis.weights.as_ref()) {
            check_weights(weights)?;
        }

        for (key, entries) in [
            ("exclude", self.excluded_versions()),
            ("include", self.included_versions()),
        ] {
            if entries.iter().any(|entry| entry.trim().is_empty()) {
                return Err(RankError::ConfigParse(format!(
                    "versions.{key} entries must be non-empty version names"
                )));
            }
        }

        Ok(())
    }
}

/// Criterion weights must be finite and strictly positive.
pub fn check_weights(weights: &[f64]) -> Result<(), RankError> {
    match weights
        .iter()
        .find(|weight| !weight.is_finite() || **weight <= 0.0)
    {
        Some(weight) => Err(RankError::ConfigParse(format!(
            "criterion weights must be finite and greater than 0.0 (found {weight})"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml_str = r#"
[project]
name = "test-repo"
"#;
        let cfg: RankConfig = toml::from_str(toml_str).expect("minimal config should parse");
        assert_eq!(cfg.project.name, "test-repo");
        assert!(cfg.project.dataset.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[project]
name = "test-repo"
dataset = "metrics.csv"

[topsis]
criteria = ["bugs"]
weights = [0.8]
alternatives = ["bug_velocity", "code_churn"]
corr_method = "kendall"

[versions]
exclude = ["Next Release"]
"#;
        let cfg: RankConfig = toml::from_str(toml_str).expect("full config should parse");
        let request = cfg.request().expect("request should resolve");
        assert_eq!(request.criteria, vec!["bugs".to_string()]);
        assert_eq!(request.weights, vec![0.8]);
        assert_eq!(
            request.alternatives,
            vec!["bug_velocity".to_string(), "code_churn".to_string()]
        );
        assert_eq!(request.method, CorrelationMethod::Kendall);
        assert_eq!(cfg.excluded_versions(), ["Next Release".to_string()]);
        assert!(cfg.included_versions().is_empty());
    }

    #[test]
    fn request_defaults_when_topsis_table_missing() {
        let cfg: RankConfig = toml::from_str("[project]\nname = \"test\"\n")
            .expect("config should parse");
        let request = cfg.request().expect("request should resolve");
        assert_eq!(request.criteria, vec!["bugs".to_string()]);
        assert_eq!(request.weights, vec![1.0]);
        assert_eq!(request.alternatives.len(), 6);
        assert_eq!(request.method, CorrelationMethod::Pearson);
    }

    #[test]
    fn validate_rejects_unknown_correlation_method() {
        let toml_str = r#"
[project]
name = "test"

[topsis]
corr_method = "cosine"
"#;
        let cfg: RankConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unknown correlation method: cosine"));
    }

    #[test]
    fn validate_rejects_non_positive_weights() {
        let toml_str = r#"
[project]
name = "test"

[topsis]
weights = [0.0]
"#;
        let cfg: RankConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("weights must be finite"));
    }

    #[test]
    fn validate_rejects_blank_version_entries() {
        let toml_str = r#"
[project]
name = "test"

[versions]
include = [" "]
"#;
        let cfg: RankConfig = toml::from_str(toml_str).expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("versions.include"));
    }

    #[test]
    fn validate_leaves_empty_name_lists_to_the_parsers() {
        let toml_str = r#"
[project]
name = "test"

[topsis]
criteria = []
alternatives = []
"#;
        let cfg: RankConfig = toml::from_str(toml_str).expect("config should parse");
        assert!(cfg.validate().is_ok());
        let request = cfg.request().expect("request should resolve");
        assert!(request.criteria.is_empty());
    }
}
