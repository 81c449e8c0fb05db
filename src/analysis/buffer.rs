// SampleBuffer - fixed-capacity ring buffer over the recent sample stream
//
// Holds the most recent filtered samples so overlapping analysis windows can
// be cut from the stream without re-reading the sensor. Insert is O(1); when
// capacity is exceeded the oldest sample is evicted. Window extraction copies
// samples out so consecutive windows may overlap by the configured stride.

use std::collections::VecDeque;

use crate::analysis::window::Window;
use crate::error::AnalysisError;
use crate::sample::Sample;

/// Fixed-capacity ring buffer of recent samples
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
    /// Nominal spacing between samples in microseconds
    nominal_interval_us: u64,
    /// Gaps above this many microseconds flag a discontinuity in cut windows
    max_gap_us: u64,
}

impl SampleBuffer {
    /// Create a buffer holding at most `capacity` samples
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of retained samples
    /// * `nominal_interval_us` - Expected sensor sample spacing
    /// * `max_gap_us` - Gap tolerance before a window is flagged discontinuous
    ///
    /// # Panics
    /// Panics if capacity is 0
    pub fn new(capacity: usize, nominal_interval_us: u64, max_gap_us: u64) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");

        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            nominal_interval_us,
            max_gap_us,
        }
    }

    /// Append one sample, evicting the oldest when full
    ///
    /// Non-monotonic input is dropped with a data-quality warning so that a
    /// misbehaving sensor clock can never produce an out-of-order window.
    ///
    /// # Returns
    /// * `true` - Sample accepted
    /// * `false` - Sample dropped (timestamp not after the previous one)
    pub fn push(&mut self, sample: Sample) -> bool {
        if let Some(last) = self.samples.back() {
            if sample.timestamp_us <= last.timestamp_us {
                log::warn!(
                    "[SampleBuffer] Dropping non-monotonic sample: {} us after {} us",
                    sample.timestamp_us,
                    last.timestamp_us
                );
                return false;
            }
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        true
    }

    /// Cut a window of `duration_us` ending at `end_us`
    ///
    /// The window covers the half-open interval `(end_us - duration_us, end_us]`.
    /// When `end_us < duration_us` the start clamps to the beginning of the
    /// stream and the interval closes on both ends, so the earliest sample is
    /// not dropped from startup windows.
    /// Fails with `InsufficientData` when fewer than half the samples the
    /// nominal rate predicts fall in the interval; a window missing less than
    /// that (after a short dropout) is still cut and carries the
    /// discontinuity flag instead.
    pub fn window(&self, duration_us: u64, end_us: u64) -> Result<Window, AnalysisError> {
        let start_us = end_us.saturating_sub(duration_us);
        let clamped = end_us < duration_us;
        let selected: Vec<Sample> = self
            .samples
            .iter()
            .filter(|s| {
                s.timestamp_us <= end_us && (s.timestamp_us > start_us || clamped)
            })
            .copied()
            .collect();

        let required = (duration_us / self.nominal_interval_us / 2).max(1) as usize;
        if selected.len() < required {
            return Err(AnalysisError::InsufficientData {
                required,
                available: selected.len(),
            });
        }

        Ok(Window::from_samples(selected, self.max_gap_us))
    }

    /// Number of currently buffered samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are buffered
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the newest buffered sample, if any
    pub fn latest_timestamp_us(&self) -> Option<u64> {
        self.samples.back().map(|s| s.timestamp_us)
    }

    /// Discard all buffered samples (between sessions)
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
