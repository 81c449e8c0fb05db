// Sample - time-stamped tri-axial accelerometer reading
//
// The pipeline ingests one Sample at a time from a wearable or phone IMU.
// Timestamps are monotonic microseconds from the sensor clock; axis values
// are acceleration in m/s^2. A Sample is immutable once recorded.

use serde::{Deserialize, Serialize};

/// One tri-axial accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Monotonic timestamp in microseconds
    pub timestamp_us: u64,
    /// Acceleration along x in m/s^2
    pub x: f32,
    /// Acceleration along y in m/s^2
    pub y: f32,
    /// Acceleration along z in m/s^2
    pub z: f32,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp_us: u64, x: f32, y: f32, z: f32) -> Self {
        Self {
            timestamp_us,
            x,
            y,
            z,
        }
    }

    /// Euclidean magnitude of the acceleration vector
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        let sample = Sample::new(0, 3.0, 4.0, 0.0);
        assert!((sample.magnitude() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_serde_roundtrip() {
        let sample = Sample::new(1_000_000, 0.1, -0.2, 9.8);
        let json = serde_json::to_string(&sample).unwrap();
        let parsed: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample);
    }
}
