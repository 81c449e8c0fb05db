// Spectral module - frequency-domain feature extraction
//
// Computes spectral features from magnitude spectra of the filtered motion
// signal: the dominant oscillation frequency and the share of power falling
// inside the tremor band.

/// Spectral feature computation over magnitude spectra
pub struct SpectralFeatures {
    bin_width_hz: f32,
}

impl SpectralFeatures {
    /// Create a spectral feature processor
    ///
    /// # Arguments
    /// * `bin_width_hz` - Frequency resolution of incoming spectra
    pub fn new(bin_width_hz: f32) -> Self {
        Self { bin_width_hz }
    }

    /// Dominant frequency of the spectrum in Hz
    ///
    /// Finds the largest-magnitude bin (excluding DC) and refines it by
    /// parabolic interpolation over the neighbouring bins, which recovers
    /// sub-bin precision from short transforms.
    ///
    /// # Returns
    /// Dominant frequency in Hz, or 0.0 for an all-zero spectrum
    pub fn dominant_frequency(&self, spectrum: &[f32]) -> f32 {
        if spectrum.len() < 2 {
            return 0.0;
        }

        let (peak_bin, &peak_mag) = match spectrum
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        {
            Some(found) => found,
            None => return 0.0,
        };

        if peak_mag < 1e-10 {
            return 0.0;
        }

        // Parabolic interpolation around the peak
        let refined = if peak_bin > 0 && peak_bin + 1 < spectrum.len() {
            let left = spectrum[peak_bin - 1];
            let right = spectrum[peak_bin + 1];
            let denom = left - 2.0 * peak_mag + right;
            if denom.abs() > 1e-10 {
                let delta = 0.5 * (left - right) / denom;
                peak_bin as f32 + delta.clamp(-0.5, 0.5)
            } else {
                peak_bin as f32
            }
        } else {
            peak_bin as f32
        };

        refined * self.bin_width_hz
    }

    /// Fraction of spectral power inside `[low_hz, high_hz]`
    ///
    /// Power is magnitude squared; DC is excluded from both numerator and
    /// denominator so gravity leakage cannot dilute the ratio.
    ///
    /// # Returns
    /// Band power ratio in [0.0, 1.0]
    pub fn band_power_ratio(&self, spectrum: &[f32], low_hz: f32, high_hz: f32) -> f32 {
        let mut band_power = 0.0f32;
        let mut total_power = 0.0f32;

        for (i, &mag) in spectrum.iter().enumerate().skip(1) {
            let freq = i as f32 * self.bin_width_hz;
            let power = mag * mag;
            total_power += power;
            if freq >= low_hz && freq <= high_hz {
                band_power += power;
            }
        }

        if total_power > 1e-10 {
            (band_power / total_power).min(1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::fft::FftProcessor;

    fn sine_spectrum(frequency: f32) -> (SpectralFeatures, Vec<f32>) {
        let sample_rate = 100.0;
        let processor = FftProcessor::new(sample_rate, 200);
        let signal: Vec<f32> = (0..200)
            .map(|i| {
                let t = i as f32 / sample_rate;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect();
        let spectrum = processor.magnitude_spectrum(&signal);
        (SpectralFeatures::new(processor.bin_width_hz()), spectrum)
    }

    #[test]
    fn test_dominant_frequency_of_sine() {
        let (features, spectrum) = sine_spectrum(6.0);
        let dominant = features.dominant_frequency(&spectrum);
        assert!(
            (dominant - 6.0).abs() < 0.5,
            "Expected ~6 Hz, got {} Hz",
            dominant
        );
    }

    #[test]
    fn test_dominant_frequency_of_silence() {
        let features = SpectralFeatures::new(0.5);
        let spectrum = vec![0.0; 129];
        assert_eq!(features.dominant_frequency(&spectrum), 0.0);
    }

    #[test]
    fn test_band_ratio_in_band_sine() {
        let (features, spectrum) = sine_spectrum(6.0);
        let ratio = features.band_power_ratio(&spectrum, 3.0, 12.0);
        assert!(
            ratio > 0.9,
            "6 Hz sine should concentrate power in the band, ratio {}",
            ratio
        );
    }

    #[test]
    fn test_band_ratio_out_of_band_sine() {
        let (features, spectrum) = sine_spectrum(25.0);
        let ratio = features.band_power_ratio(&spectrum, 3.0, 12.0);
        assert!(
            ratio < 0.1,
            "25 Hz sine should fall outside the band, ratio {}",
            ratio
        );
    }

    #[test]
    fn test_band_ratio_bounds() {
        let (features, spectrum) = sine_spectrum(6.0);
        let ratio = features.band_power_ratio(&spectrum, 3.0, 12.0);
        assert!((0.0..=1.0).contains(&ratio));
    }
}
