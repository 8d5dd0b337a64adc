use thiserror::Error;

use crate::api::WizardStep;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("column `{column}` is already selected as the {taken_by} axis")]
    AxisConflict {
        column: String,
        taken_by: &'static str,
    },

    #[error("axis selection incomplete: {0}")]
    AxisInvalid(String),

    #[error("cannot leave step {step:?}: {reason}")]
    StepBlocked { step: WizardStep, reason: String },

    #[error("invalid wizard transition: {0}")]
    InvalidTransition(String),

    #[error("unknown theme `{0}`")]
    UnknownTheme(String),

    #[error("chart `{id}` not found")]
    NotFound { id: String },

    #[error("chart `{id}` is at revision {actual}, expected {expected}")]
    RevisionConflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("remote mirror failure: {0}")]
    Remote(String),
}
