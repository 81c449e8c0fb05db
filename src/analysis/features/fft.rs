// FFT module - magnitude spectrum computation
//
// Computes Hann-windowed magnitude spectra from per-axis signals. The
// transform is planned once at construction; a session pipeline is
// single-threaded so no locking is needed around the plan.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Smallest supported transform length
pub const MIN_TRANSFORM_LEN: usize = 64;

/// FFT processor producing magnitude spectra from signal windows
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    sample_rate: f32,
    /// Pre-computed Hann window
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a processor sized for windows of up to `window_len` samples
    ///
    /// The transform length is the next power of two at or above
    /// `window_len`, never below `MIN_TRANSFORM_LEN`; shorter inputs are
    /// zero-padded.
    pub fn new(sample_rate: f32, window_len: usize) -> Self {
        let fft_size = window_len.next_power_of_two().max(MIN_TRANSFORM_LEN);

        // Hann window to reduce spectral leakage
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            sample_rate,
            window,
        }
    }

    /// Transform length in samples
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Width of one frequency bin in Hz
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate / self.fft_size as f32
    }

    /// Compute the magnitude spectrum of one signal
    ///
    /// Applies the Hann window, zero-pads to the transform length, and
    /// returns magnitudes for positive frequencies only (symmetry of the
    /// real-valued FFT). Input beyond the transform length is truncated.
    ///
    /// # Returns
    /// Magnitude spectrum of size `fft_size / 2 + 1`
    pub fn magnitude_spectrum(&self, signal: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(self.fft_size);

        for (i, &value) in signal.iter().take(self.fft_size).enumerate() {
            buffer.push(Complex::new(value * self.window[i], 0.0));
        }
        while buffer.len() < self.fft_size {
            buffer.push(Complex::new(0.0, 0.0));
        }

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_size_rounding() {
        let processor = FftProcessor::new(100.0, 200);
        assert_eq!(processor.fft_size(), 256);

        let tiny = FftProcessor::new(100.0, 10);
        assert_eq!(tiny.fft_size(), MIN_TRANSFORM_LEN);
    }

    #[test]
    fn test_bin_width() {
        let processor = FftProcessor::new(100.0, 200);
        assert!((processor.bin_width_hz() - 100.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_spectrum_peak_at_signal_frequency() {
        let sample_rate = 100.0;
        let processor = FftProcessor::new(sample_rate, 200);

        // 6 Hz sine, 200 samples
        let signal: Vec<f32> = (0..200)
            .map(|i| {
                let t = i as f32 / sample_rate;
                (2.0 * std::f32::consts::PI * 6.0 * t).sin()
            })
            .collect();

        let spectrum = processor.magnitude_spectrum(&signal);
        assert_eq!(spectrum.len(), 129);

        let (peak_bin, _) = spectrum
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        let peak_hz = peak_bin as f32 * processor.bin_width_hz();
        assert!(
            (peak_hz - 6.0).abs() < 1.0,
            "Expected peak near 6 Hz, got {} Hz",
            peak_hz
        );
    }

    #[test]
    fn test_short_input_zero_padded() {
        let processor = FftProcessor::new(100.0, 200);
        let spectrum = processor.magnitude_spectrum(&[1.0; 50]);
        assert_eq!(spectrum.len(), 129);
    }
}
