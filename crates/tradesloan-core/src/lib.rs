pub mod amortization;
pub mod error;
pub mod fields;
pub mod policy;
pub mod profile;
pub mod rates;
pub mod session;
pub mod types;

#[cfg(feature = "eligibility")]
pub mod eligibility;

#[cfg(feature = "eligibility")]
pub mod loan;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::TradesLoanError;
pub use types::*;

/// Standard result type for all tradesloan operations
pub type TradesLoanResult<T> = Result<T, TradesLoanError>;
