// FeatureExtractor - windowed feature extraction for tremor classification
//
// Extracts the features used to decide whether a window of filtered motion
// contains tremor and how severe it is.
//
// Module organization:
// - types: Data structures (FeatureVector)
// - fft: Magnitude spectrum computation with Hann windowing
// - spectral: Frequency-domain features (dominant frequency, band power ratio)
// - temporal: Time-domain features (RMS amplitude)
// - mod.rs: Coordinator (FeatureExtractor)
//
// Spectral features are taken from the most energetic axis so a tremor that
// expresses mainly in one plane is not diluted by the quiet axes; RMS
// amplitude combines all three axes.

pub mod fft;
mod spectral;
mod temporal;
mod types;

pub use fft::MIN_TRANSFORM_LEN;
pub use types::FeatureVector;

use fft::FftProcessor;
use spectral::SpectralFeatures;
use temporal::TemporalFeatures;

use crate::analysis::window::Window;
use crate::error::AnalysisError;

/// FeatureExtractor coordinates the feature extraction pipeline
///
/// Deterministic: identical windows always yield identical features.
pub struct FeatureExtractor {
    fft_processor: FftProcessor,
    spectral_features: SpectralFeatures,
    band_low_hz: f32,
    band_high_hz: f32,
}

impl FeatureExtractor {
    /// Create an extractor for the given rate, window length, and band
    ///
    /// # Arguments
    /// * `sample_rate` - Sensor sample rate in Hz
    /// * `window_len` - Nominal window length in samples (sizes the FFT)
    /// * `band_low_hz` / `band_high_hz` - Tremor band edges
    pub fn new(sample_rate: f32, window_len: usize, band_low_hz: f32, band_high_hz: f32) -> Self {
        let fft_processor = FftProcessor::new(sample_rate, window_len);
        let spectral_features = SpectralFeatures::new(fft_processor.bin_width_hz());

        Self {
            fft_processor,
            spectral_features,
            band_low_hz,
            band_high_hz,
        }
    }

    /// Extract all features from one window
    ///
    /// 1. Compute per-axis magnitude spectra
    /// 2. Pick the axis with the most tremor-band power
    /// 3. Dominant frequency and band ratio from that axis
    /// 4. RMS amplitude across all axes
    ///
    /// # Returns
    /// * `Ok(FeatureVector)` - Extracted features
    /// * `Err(AnalysisError::InsufficientData)` - Window shorter than the
    ///   minimum transform length
    pub fn extract(&self, window: &Window) -> Result<FeatureVector, AnalysisError> {
        if window.len() < MIN_TRANSFORM_LEN {
            return Err(AnalysisError::InsufficientData {
                required: MIN_TRANSFORM_LEN,
                available: window.len(),
            });
        }

        let samples = window.samples();
        let axes: [Vec<f32>; 3] = [
            samples.iter().map(|s| s.x).collect(),
            samples.iter().map(|s| s.y).collect(),
            samples.iter().map(|s| s.z).collect(),
        ];

        // Spectrum of each axis, keeping the one with the most band power
        let mut best_spectrum: Option<Vec<f32>> = None;
        let mut best_band_power = f32::MIN;
        for axis in &axes {
            let spectrum = self.fft_processor.magnitude_spectrum(axis);
            let band_power = self.band_power(&spectrum);
            if band_power > best_band_power {
                best_band_power = band_power;
                best_spectrum = Some(spectrum);
            }
        }
        let spectrum = best_spectrum.unwrap_or_default();

        let dominant_frequency_hz = self.spectral_features.dominant_frequency(&spectrum);
        let band_power_ratio =
            self.spectral_features
                .band_power_ratio(&spectrum, self.band_low_hz, self.band_high_hz);
        let amplitude_rms = TemporalFeatures::compute_rms(samples);

        Ok(FeatureVector {
            dominant_frequency_hz,
            band_power_ratio,
            amplitude_rms,
        })
    }

    /// Absolute tremor-band power of one spectrum
    fn band_power(&self, spectrum: &[f32]) -> f32 {
        let bin_width = self.fft_processor.bin_width_hz();
        spectrum
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(i, _)| {
                let freq = *i as f32 * bin_width;
                freq >= self.band_low_hz && freq <= self.band_high_hz
            })
            .map(|(_, &mag)| mag * mag)
            .sum()
    }
}
