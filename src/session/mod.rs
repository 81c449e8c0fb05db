// SessionAggregator - session-level accumulation of classified windows
//
// Accumulates per-window classifications into one SessionSummary for the
// lifetime of a recording session. The aggregator is a small state machine:
//
//   Idle --start()--> Recording --finalize()--> Finalized
//
// Classifications are accepted only while Recording. After finalize() the
// summary is immutable and any further input fails with SessionClosed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::classifier::Severity;
use crate::analysis::WindowResult;
use crate::error::SessionError;

/// Aggregator lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created but not yet recording
    Idle,
    /// Accepting classified windows
    Recording,
    /// Finalized; summary is immutable
    Finalized,
}

/// Finalized summary of one recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique session id
    pub id: Uuid,
    /// Sensor timestamp of the first analyzed window start
    pub started_at_us: u64,
    /// Sensor timestamp of the last analyzed window end
    pub ended_at_us: u64,
    /// Analyzed span in seconds
    pub duration_s: f64,
    /// Total windows analyzed
    pub windows_analyzed: u64,
    /// Windows classified as tremor
    pub tremor_windows: u64,
    /// Runs of consecutive tremor windows
    pub episode_count: u64,
    /// Mean severity over tremor windows (None when no tremor was seen)
    pub mean_severity: Severity,
    /// Highest severity observed
    pub peak_severity: Severity,
    /// Mean RMS amplitude over tremor windows in m/s^2
    pub mean_amplitude_rms: f32,
    /// Mean dominant frequency over tremor windows in Hz
    pub mean_dominant_frequency_hz: f32,
    /// Mean UPDRS-style score over all windows
    pub mean_updrs_score: f32,
    /// Windows flagged with a timestamp discontinuity
    pub discontinuities: u64,
}

/// Accumulates classified windows into a SessionSummary
pub struct SessionAggregator {
    state: SessionState,
    id: Uuid,
    started_at_us: Option<u64>,
    ended_at_us: Option<u64>,
    windows_analyzed: u64,
    tremor_windows: u64,
    episode_count: u64,
    /// True while inside a run of consecutive tremor windows
    in_episode: bool,
    severity_rank_sum: u64,
    peak_severity: Severity,
    amplitude_sum: f64,
    frequency_sum: f64,
    updrs_sum: u64,
    discontinuities: u64,
}

impl SessionAggregator {
    /// Create an aggregator in the Idle state with a fresh session id
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            id: Uuid::new_v4(),
            started_at_us: None,
            ended_at_us: None,
            windows_analyzed: 0,
            tremor_windows: 0,
            episode_count: 0,
            in_episode: false,
            severity_rank_sum: 0,
            peak_severity: Severity::None,
            amplitude_sum: 0.0,
            frequency_sum: 0.0,
            updrs_sum: 0,
            discontinuities: 0,
        }
    }

    /// Session id assigned at construction
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begin recording
    ///
    /// # Returns
    /// * `Err(SessionError::AlreadyRecording)` - start() while Recording
    /// * `Err(SessionError::SessionClosed)` - start() after finalize()
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Recording;
                log::info!("[Session {}] Recording started", self.id);
                Ok(())
            }
            SessionState::Recording => Err(SessionError::AlreadyRecording),
            SessionState::Finalized => Err(SessionError::SessionClosed),
        }
    }

    /// Record one classified window
    ///
    /// Only legal while Recording.
    pub fn record(&mut self, result: &WindowResult) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => return Err(SessionError::NotRecording),
            SessionState::Finalized => return Err(SessionError::SessionClosed),
            SessionState::Recording => {}
        }

        if self.started_at_us.is_none() {
            self.started_at_us = Some(result.window_start_us);
        }
        self.ended_at_us = Some(result.window_end_us);

        self.windows_analyzed += 1;
        self.updrs_sum += result.classification.updrs_score as u64;
        if result.discontinuity {
            self.discontinuities += 1;
        }

        if result.classification.present {
            self.tremor_windows += 1;
            self.severity_rank_sum += result.classification.severity.rank() as u64;
            self.amplitude_sum += result.features.amplitude_rms as f64;
            self.frequency_sum += result.features.dominant_frequency_hz as f64;
            self.peak_severity = self.peak_severity.max(result.classification.severity);
            if !self.in_episode {
                self.episode_count += 1;
                self.in_episode = true;
            }
        } else {
            self.in_episode = false;
        }

        Ok(())
    }

    /// Finalize and return the immutable summary
    ///
    /// # Returns
    /// * `Err(SessionError::NotRecording)` - finalize() while Idle
    /// * `Err(SessionError::SessionClosed)` - finalize() called twice
    pub fn finalize(&mut self) -> Result<SessionSummary, SessionError> {
        match self.state {
            SessionState::Idle => return Err(SessionError::NotRecording),
            SessionState::Finalized => return Err(SessionError::SessionClosed),
            SessionState::Recording => {}
        }
        self.state = SessionState::Finalized;

        let started_at_us = self.started_at_us.unwrap_or(0);
        let ended_at_us = self.ended_at_us.unwrap_or(started_at_us);

        let mean_severity = if self.tremor_windows > 0 {
            Severity::from_rank(self.severity_rank_sum as f64 / self.tremor_windows as f64)
        } else {
            Severity::None
        };
        let mean_amplitude_rms = if self.tremor_windows > 0 {
            (self.amplitude_sum / self.tremor_windows as f64) as f32
        } else {
            0.0
        };
        let mean_dominant_frequency_hz = if self.tremor_windows > 0 {
            (self.frequency_sum / self.tremor_windows as f64) as f32
        } else {
            0.0
        };
        let mean_updrs_score = if self.windows_analyzed > 0 {
            self.updrs_sum as f32 / self.windows_analyzed as f32
        } else {
            0.0
        };

        let summary = SessionSummary {
            id: self.id,
            started_at_us,
            ended_at_us,
            duration_s: ended_at_us.saturating_sub(started_at_us) as f64 / 1_000_000.0,
            windows_analyzed: self.windows_analyzed,
            tremor_windows: self.tremor_windows,
            episode_count: self.episode_count,
            mean_severity,
            peak_severity: self.peak_severity,
            mean_amplitude_rms,
            mean_dominant_frequency_hz,
            mean_updrs_score,
            discontinuities: self.discontinuities,
        };

        log::info!(
            "[Session {}] Finalized: {} windows, {} tremor, {} episodes, mean severity {:?}",
            self.id,
            summary.windows_analyzed,
            summary.tremor_windows,
            summary.episode_count,
            summary.mean_severity
        );

        Ok(summary)
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}
