pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "cash_flow")]
pub mod cash_flow;

#[cfg(feature = "returns")]
pub mod returns;

#[cfg(feature = "grading")]
pub mod grading;

#[cfg(feature = "deal")]
pub mod deal;

pub use error::DealSandboxError;
pub use types::*;

/// Standard result type for all deal-sandbox operations
pub type DealSandboxResult<T> = Result<T, DealSandboxError>;
