// Analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Analysis error code constants
///
/// These constants provide a single source of truth for error codes
/// shared with API layers that report pipeline failures numerically.
///
/// Error code range: 1001-1002
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Not enough samples to form or transform the requested window
    pub const INSUFFICIENT_DATA: i32 = 1001;

    /// Filter or feature configuration is invalid
    pub const INVALID_CONFIG: i32 = 1002;
}

/// Log an analysis error with structured context
///
/// Logs the numeric error code alongside the component and message so
/// data-quality issues can be grepped out of session logs.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=Pipeline, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Analysis-related errors
///
/// These errors cover the sample buffer, feature extraction, and
/// configuration validation. All of them are recoverable: callers retry
/// once more data has arrived or fix the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Not enough samples buffered to satisfy a window request, or a window
    /// shorter than the minimum transform length
    InsufficientData { required: usize, available: usize },

    /// Configuration values are out of range (e.g. band edges reversed)
    InvalidConfig { reason: String },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::InsufficientData { .. } => AnalysisErrorCodes::INSUFFICIENT_DATA,
            AnalysisError::InvalidConfig { .. } => AnalysisErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::InsufficientData {
                required,
                available,
            } => {
                format!(
                    "Insufficient data: {} samples required, {} available",
                    required, available
                )
            }
            AnalysisError::InvalidConfig { reason } => {
                format!("Invalid analysis configuration: {}", reason)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnalysisError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for AnalysisError {}
