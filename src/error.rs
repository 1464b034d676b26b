use thiserror::Error;

use crate::models::PlanStatus;

pub type EngineResult<T> = Result<T, EngineError>;

/// Rejections are all-or-nothing: a failed operation leaves the plan or
/// session exactly as it was before the call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("cannot {action} a plan with status '{from}'")]
    InvalidTransition {
        from: PlanStatus,
        action: &'static str,
    },

    #[error("not found: {0}")]
    NotFound(String),
}
