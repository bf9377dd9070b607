//! Error types for loan input and configuration handling
//!
//! The simulation itself never fails; these errors only come from loading
//! and validating what collaborators hand to it.

use thiserror::Error;

/// Errors raised while loading or validating simulation input
#[derive(Debug, Error)]
pub enum DebtError {
    /// A loan field failed validation
    #[error("Invalid loan {loan_id}: {field} {reason}")]
    InvalidLoan {
        loan_id: String,
        field: String,
        reason: String,
    },

    /// Two loans in the same run share an id
    #[error("Duplicate loan id: {0}")]
    DuplicateLoanId(String),

    /// Invalid simulation or optimizer configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the input-handling layer
pub type Result<T> = std::result::Result<T, DebtError>;
