use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("no criteria provided")]
    NoCriteriaProvided,

    #[error("no alternatives provided")]
    NoAlternativeProvided,

    #[error("invalid criterion name(s): {}", .0.join(", "))]
    InvalidCriterion(Vec<String>),

    #[error("invalid alternative name(s): {}", .0.join(", "))]
    InvalidAlternative(Vec<String>),

    #[error("some criteria are missing weights: expected {expected}, found {found}")]
    MissingWeight { expected: usize, found: usize },

    #[error("dimension mismatch: {0}")]
    Dimension(String),

    #[error(
        "cannot build decision matrix with {criteria} criteria and {alternatives} alternatives"
    )]
    EmptyDecisionMatrix { criteria: usize, alternatives: usize },

    #[error("series '{label}' has {found} values, expected {expected}")]
    SeriesLengthMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("label '{0}' was added more than once")]
    DuplicateLabel(String),

    #[error("dataset has no column '{0}'")]
    MissingColumn(String),

    #[error("unknown correlation method: {0}")]
    UnknownCorrelationMethod(String),

    #[error("dataset parse error: {0}")]
    DatasetParse(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("{path}: batch columns [{expected}] do not match alternatives [{found}]")]
    BatchColumnMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RankError {
    /// True for errors caused by the requested names, weights or settings rather than
    /// by the environment. These surface before any numeric work starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RankError::NoCriteriaProvided
                | RankError::NoAlternativeProvided
                | RankError::InvalidCriterion(_)
                | RankError::InvalidAlternative(_)
                | RankError::MissingWeight { .. }
                | RankError::Dimension(_)
                | RankError::EmptyDecisionMatrix { .. }
                | RankError::DuplicateLabel(_)
                | RankError::MissingColumn(_)
                | RankError::UnknownCorrelationMethod(_)
                | RankError::ConfigParse(_)
                | RankError::Toml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
