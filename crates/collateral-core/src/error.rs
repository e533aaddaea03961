use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollateralError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Infeasible allocation: {0}")]
    Infeasible(String),

    #[error("Solver failure: {0}")]
    Solver(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CollateralError {
    fn from(e: serde_json::Error) -> Self {
        CollateralError::Serialization(e.to_string())
    }
}
