use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealSandboxError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Degenerate computation: {0}")]
    ComputationDegenerate(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DealSandboxError {
    /// A value left the 96-bit decimal range.
    pub fn overflow(context: &str) -> Self {
        DealSandboxError::ComputationDegenerate(format!(
            "{context} exceeds the representable range"
        ))
    }
}

impl From<serde_json::Error> for DealSandboxError {
    fn from(e: serde_json::Error) -> Self {
        DealSandboxError::SerializationError(e.to_string())
    }
}
