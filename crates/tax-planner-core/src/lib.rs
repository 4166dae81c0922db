pub mod comparison;
pub mod engine;
pub mod error;
pub mod regimes;
pub mod types;

#[cfg(feature = "recommendations")]
pub mod recommendations;

pub use error::TaxPlannerError;
pub use types::*;

/// Standard result type for all tax-planner operations
pub type TaxPlannerResult<T> = Result<T, TaxPlannerError>;
