//! Error types for the lead pipeline

use thiserror::Error;

/// Failure taxonomy for all lead operations
///
/// A duplicate contact at creation time is not represented here: it is the
/// positive `CreateOutcome::AlreadyExists` result, not a failure.
#[derive(Error, Debug)]
pub enum LeadError {
    /// The store endpoint/credential pair was never configured; checked
    /// before any store call is issued
    #[error("lead store is not connected")]
    NotConnected,

    #[error("lead not found: {0}")]
    NotFound(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// Underlying store call failed; the cause is folded into the message
    #[error("store call failed: {0}")]
    Persistence(String),
}

/// Result type for lead operations
pub type Result<T> = std::result::Result<T, LeadError>;
