use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("team not found: {name} (available: {})", available.join(", "))]
    UnknownTeam { name: String, available: Vec<String> },

    #[error("{team}: {field} = {value} is outside {expected}")]
    DomainViolation {
        team: String,
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("team name must not be empty")]
    EmptyName,

    #[error("duplicate team: {name}")]
    DuplicateTeam { name: String },

    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("score grid bounded at {found} goals, expected {expected}")]
    GridMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
