//! Error types for the datewise library
//!
//! Parsing text never fails: unmatched or invalid input simply yields fewer
//! results. Errors are reserved for building the inputs of a parse call.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the datewise library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Named timezone not known to the timezone database
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Minute offset outside the representable range
    #[error("Invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),

    /// Reference instant cannot be expressed in the requested zone
    #[error("Invalid reference instant: {0}")]
    InvalidReference(String),

    /// Date expression given on the command line could not be understood
    #[error("Invalid date expression: {0}")]
    InvalidDateExpression(String),
}
