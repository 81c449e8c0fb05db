// Window - fixed-duration slice of the sample stream
//
// A Window is the unit of feature computation: an ordered run of samples
// covering one analysis interval, drained from the SampleBuffer and owned
// by the feature extractor until its features are computed.
//
// Invariant: samples are monotonically increasing in timestamp. Gaps larger
// than the allowed inter-sample interval set a discontinuity flag instead of
// failing; downstream consumers treat flagged windows as lower quality data.

use crate::sample::Sample;

/// Ordered sequence of samples covering one analysis interval
#[derive(Debug, Clone)]
pub struct Window {
    samples: Vec<Sample>,
    /// True when any inter-sample gap exceeded the allowed maximum
    discontinuity: bool,
}

impl Window {
    /// Build a window from samples already in timestamp order
    ///
    /// # Arguments
    /// * `samples` - Samples in monotonically increasing timestamp order
    /// * `max_gap_us` - Largest tolerated gap between neighbouring samples
    ///
    /// Gaps above `max_gap_us` set the discontinuity flag; they never fail
    /// the window. The pipeline logs each gap once at ingest time, so this
    /// constructor stays silent even though overlapping windows may see the
    /// same gap repeatedly.
    ///
    /// # Panics
    /// Debug builds assert the monotonicity invariant; the SampleBuffer is
    /// the only producer and rejects out-of-order input before it gets here.
    pub fn from_samples(samples: Vec<Sample>, max_gap_us: u64) -> Self {
        let mut discontinuity = false;
        for pair in samples.windows(2) {
            debug_assert!(
                pair[1].timestamp_us > pair[0].timestamp_us,
                "window samples must be in increasing timestamp order"
            );
            let gap = pair[1].timestamp_us.saturating_sub(pair[0].timestamp_us);
            if gap > max_gap_us {
                discontinuity = true;
            }
        }

        Self {
            samples,
            discontinuity,
        }
    }

    /// Samples in this window, oldest first
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples in the window
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when a timestamp gap was detected while building the window
    pub fn has_discontinuity(&self) -> bool {
        self.discontinuity
    }

    /// Timestamp of the first sample, if any
    pub fn start_timestamp_us(&self) -> Option<u64> {
        self.samples.first().map(|s| s.timestamp_us)
    }

    /// Timestamp of the last sample, if any
    pub fn end_timestamp_us(&self) -> Option<u64> {
        self.samples.last().map(|s| s.timestamp_us)
    }

    /// Window span in seconds (0.0 for fewer than two samples)
    pub fn duration_s(&self) -> f64 {
        match (self.start_timestamp_us(), self.end_timestamp_us()) {
            (Some(start), Some(end)) => (end.saturating_sub(start)) as f64 / 1_000_000.0,
            _ => 0.0,
        }
    }
}
