//! Configuration management for dynamic parameter tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling threshold iteration without recompilation. Key parameters for
//! sampling, band-pass filtering, windowing, and severity classification
//! can be adjusted via the config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete pipeline configuration
///
/// Sections missing from a config file fall back to their defaults, so a
/// file may override just the thresholds under iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub windowing: WindowConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Sensor sampling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Nominal sensor sample rate in Hz
    pub sample_rate_hz: f32,
    /// Ring buffer capacity in seconds of signal
    pub buffer_capacity_s: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            // Typical phone/wearable IMU rate
            sample_rate_hz: 100.0,
            buffer_capacity_s: 10.0,
        }
    }
}

/// Band-pass filter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Lower edge of the tremor band in Hz
    pub band_low_hz: f32,
    /// Upper edge of the tremor band in Hz
    pub band_high_hz: f32,
    /// Number of cascaded biquad stages (2 stages = 4th-order response)
    pub cascade_stages: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            // 3-12 Hz covers physiological and pathological tremor
            band_low_hz: 3.0,
            band_high_hz: 12.0,
            cascade_stages: 2,
        }
    }
}

/// Analysis window parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window duration in seconds
    pub duration_s: f32,
    /// Stride between consecutive windows in seconds
    pub stride_s: f32,
    /// Inter-sample gap above nominal_interval * this factor flags a discontinuity
    pub max_gap_factor: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            duration_s: 2.0,
            stride_s: 0.5,
            max_gap_factor: 1.5,
        }
    }
}

/// Severity classification thresholds
///
/// Amplitude floors are RMS acceleration in m/s^2 measured on the band-pass
/// filtered signal. Each floor is inclusive, so a value sitting exactly on a
/// boundary lands in the higher severity bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum tremor-band power ratio for a window to count as tremor
    pub min_band_ratio: f32,
    /// Minimum RMS amplitude for a window to count as tremor (mild floor)
    pub amp_mild_floor: f32,
    /// RMS amplitude at or above which a window is moderate
    pub amp_moderate_floor: f32,
    /// RMS amplitude at or above which a window is severe
    pub amp_severe_floor: f32,
    /// RMS amplitude below which a present tremor scores UPDRS 1 rather than 2
    pub amp_slight_ceiling: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_band_ratio: 0.4,
            amp_mild_floor: 0.05,
            amp_moderate_floor: 0.15,
            amp_severe_floor: 0.40,
            amp_slight_ceiling: 0.10,
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            sampling: SamplingConfig::default(),
            filter: FilterConfig::default(),
            windowing: WindowConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Number of samples in one analysis window at the configured rate
    pub fn window_len(&self) -> usize {
        (self.windowing.duration_s * self.sampling.sample_rate_hz).round() as usize
    }

    /// Number of samples between consecutive window starts
    pub fn stride_len(&self) -> usize {
        ((self.windowing.stride_s * self.sampling.sample_rate_hz).round() as usize).max(1)
    }

    /// Ring buffer capacity in samples
    pub fn buffer_capacity(&self) -> usize {
        ((self.sampling.buffer_capacity_s * self.sampling.sample_rate_hz).round() as usize).max(1)
    }
}
