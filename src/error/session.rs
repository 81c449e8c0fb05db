// Session error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Session error code constants
///
/// Error code range: 2001-2005
pub struct SessionErrorCodes {}

impl SessionErrorCodes {
    /// No recording session is active
    pub const NOT_RECORDING: i32 = 2001;

    /// A recording session is already active
    pub const ALREADY_RECORDING: i32 = 2002;

    /// Session has been finalized and rejects further input
    pub const SESSION_CLOSED: i32 = 2003;

    /// Session id is unknown to the manager
    pub const UNKNOWN_SESSION: i32 = 2004;

    /// Session worker thread died without producing a summary
    pub const WORKER_FAILED: i32 = 2005;
}

/// Log a session error with structured context
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=SessionAggregator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Session lifecycle errors
///
/// These errors cover the aggregator state machine and the session manager.
/// All are recoverable and reported to the caller, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation requires an active recording session
    NotRecording,

    /// start was called while a session is already recording
    AlreadyRecording,

    /// Session has been finalized; its summary is immutable
    SessionClosed,

    /// Manager received an id that maps to no live session
    UnknownSession { id: String },

    /// Session worker thread panicked or exited without a summary
    WorkerFailed { id: String },
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::NotRecording => SessionErrorCodes::NOT_RECORDING,
            SessionError::AlreadyRecording => SessionErrorCodes::ALREADY_RECORDING,
            SessionError::SessionClosed => SessionErrorCodes::SESSION_CLOSED,
            SessionError::UnknownSession { .. } => SessionErrorCodes::UNKNOWN_SESSION,
            SessionError::WorkerFailed { .. } => SessionErrorCodes::WORKER_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::NotRecording => {
                "No recording session active. Call start_session() first.".to_string()
            }
            SessionError::AlreadyRecording => {
                "Session already recording. Call stop_session() first.".to_string()
            }
            SessionError::SessionClosed => {
                "Session finalized. Summary is immutable and accepts no further input.".to_string()
            }
            SessionError::UnknownSession { id } => {
                format!("Unknown session id: {}", id)
            }
            SessionError::WorkerFailed { id } => {
                format!("Worker thread for session {} exited abnormally", id)
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for SessionError {}
