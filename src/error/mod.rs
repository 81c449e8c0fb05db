// Error types for the tremor detection core
//
// This module defines custom error types for analysis and session operations,
// providing structured error handling with error codes suitable for callers
// that map failures onto API responses.

mod analysis;
mod session;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};
pub use session::{log_session_error, SessionError, SessionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the crate boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
