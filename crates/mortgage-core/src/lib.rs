pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "eligibility")]
pub mod eligibility;

#[cfg(feature = "application")]
pub mod application;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage-eligibility operations
pub type EvalResult<T> = Result<T, MortgageError>;
