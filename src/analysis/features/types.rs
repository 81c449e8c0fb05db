// Types module - data structures for window features

use serde::{Deserialize, Serialize};

/// Features extracted from one analysis window
///
/// One FeatureVector is produced per Window and consumed by the severity
/// classifier. Each feature captures a different property of the band-pass
/// filtered motion signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Dominant oscillation frequency in Hz
    ///
    /// Peak of the magnitude spectrum on the most energetic axis.
    /// Pathological tremor concentrates in the 3-12 Hz band.
    pub dominant_frequency_hz: f32,

    /// Tremor-band power ratio (0.0 to 1.0)
    ///
    /// Spectral power inside the tremor band divided by total power.
    /// High values indicate oscillation rather than broadband movement.
    pub band_power_ratio: f32,

    /// RMS acceleration amplitude in m/s^2
    ///
    /// Computed across all three axes of the filtered signal; the primary
    /// severity cue.
    pub amplitude_rms: f32,
}
