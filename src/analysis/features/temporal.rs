// Temporal module - time-domain feature extraction
//
// Computes features directly from the filtered sample stream, without a
// frequency transform.

use crate::sample::Sample;

/// Time-domain feature computation
pub struct TemporalFeatures;

impl TemporalFeatures {
    /// RMS acceleration across all three axes
    ///
    /// Formula: sqrt(mean(x^2 + y^2 + z^2)) over the window. After band-pass
    /// filtering each axis is zero-mean, so this measures oscillation energy
    /// rather than orientation.
    ///
    /// # Returns
    /// RMS amplitude in m/s^2 (0.0 for an empty window)
    pub fn compute_rms(samples: &[Sample]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }

        let sum_squares: f64 = samples
            .iter()
            .map(|s| {
                let m = (s.x * s.x + s.y * s.y + s.z * s.z) as f64;
                m
            })
            .sum();

        (sum_squares / samples.len() as f64).sqrt() as f32
    }
}
