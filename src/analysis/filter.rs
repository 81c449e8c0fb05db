// TremorBandFilter - causal band-pass filtering of the raw sensor stream
//
// Isolates the 3-12 Hz physiological tremor band from raw acceleration using
// a cascade of 2nd-order Butterworth band-pass biquads, applied to each axis
// independently. The filter is stateful (retains its history across calls)
// and resettable between sessions.
//
// Difference equation per biquad (a0 normalized to 1):
// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]

use crate::config::FilterConfig;
use crate::error::AnalysisError;
use crate::sample::Sample;

/// Biquad (2nd-order IIR) filter coefficients in normalized form
#[derive(Debug, Clone, Copy)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// 2nd-order Butterworth band-pass coefficients
    ///
    /// # Arguments
    /// * `sample_rate` - Sampling frequency in Hz
    /// * `low_cutoff` - Lower band edge in Hz
    /// * `high_cutoff` - Upper band edge in Hz
    pub fn butterworth_bandpass(sample_rate: f32, low_cutoff: f32, high_cutoff: f32) -> Self {
        use std::f32::consts::PI;

        // Geometric center frequency of the pass band
        let center = (low_cutoff * high_cutoff).sqrt();
        let bandwidth = high_cutoff - low_cutoff;

        let omega = 2.0 * PI * center / sample_rate;
        let cos_omega = omega.cos();
        let sin_omega = omega.sin();
        let bw = 2.0 * PI * bandwidth / sample_rate;
        let alpha = sin_omega * (bw / 2.0).sinh();

        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;
        let b0 = alpha;
        let b1 = 0.0;
        let b2 = -alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Delay-line state for one biquad on one axis
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadState {
    fn process(&mut self, coeffs: &BiquadCoeffs, x: f32) -> f32 {
        let y = coeffs.b0 * x + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

const AXES: usize = 3;

/// Causal band-pass filter over the tri-axial sample stream
///
/// One cascade of biquad stages per axis; axes never share state.
pub struct TremorBandFilter {
    coeffs: BiquadCoeffs,
    /// stages[axis][stage]
    stages: [Vec<BiquadState>; AXES],
    /// Delay lines seeded from the first sample yet?
    primed: bool,
}

impl TremorBandFilter {
    /// Create a filter for the configured tremor band
    ///
    /// # Arguments
    /// * `sample_rate` - Sensor sample rate in Hz
    /// * `config` - Band edges and cascade depth
    ///
    /// # Returns
    /// * `Ok(TremorBandFilter)` - Ready-to-use filter
    /// * `Err(AnalysisError::InvalidConfig)` - Band edges reversed, out of
    ///   the Nyquist range, or zero cascade stages
    pub fn new(sample_rate: f32, config: &FilterConfig) -> Result<Self, AnalysisError> {
        let nyquist = sample_rate / 2.0;
        if config.band_low_hz <= 0.0 || config.band_low_hz >= config.band_high_hz {
            return Err(AnalysisError::InvalidConfig {
                reason: format!(
                    "band edges must satisfy 0 < low < high (got {} and {} Hz)",
                    config.band_low_hz, config.band_high_hz
                ),
            });
        }
        if config.band_high_hz >= nyquist {
            return Err(AnalysisError::InvalidConfig {
                reason: format!(
                    "upper band edge {} Hz must be below Nyquist ({} Hz)",
                    config.band_high_hz, nyquist
                ),
            });
        }
        if config.cascade_stages == 0 {
            return Err(AnalysisError::InvalidConfig {
                reason: "cascade_stages must be at least 1".to_string(),
            });
        }

        let coeffs = BiquadCoeffs::butterworth_bandpass(
            sample_rate,
            config.band_low_hz,
            config.band_high_hz,
        );

        Ok(Self {
            coeffs,
            stages: std::array::from_fn(|_| vec![BiquadState::default(); config.cascade_stages]),
            primed: false,
        })
    }

    /// Filter one sample, returning the band-limited reading
    ///
    /// The timestamp is carried through unchanged; each axis runs through
    /// its own biquad cascade.
    pub fn process(&mut self, sample: Sample) -> Sample {
        let mut axes = [sample.x, sample.y, sample.z];
        if !self.primed {
            self.prime(&axes);
        }
        for (axis, value) in axes.iter_mut().enumerate() {
            for stage in &mut self.stages[axis] {
                *value = stage.process(&self.coeffs, *value);
            }
        }

        Sample {
            timestamp_us: sample.timestamp_us,
            x: axes[0],
            y: axes[1],
            z: axes[2],
        }
    }

    /// Clear all delay-line state (between sessions)
    pub fn reset(&mut self) {
        for axis in &mut self.stages {
            for stage in axis {
                stage.reset();
            }
        }
        self.primed = false;
    }

    /// Seed the first stage's input history with the first sample
    ///
    /// The band-pass has zero DC gain (b0 + b1 + b2 = 0), so treating the
    /// first reading as if it had been present forever suppresses the step
    /// transient that a constant like gravity would otherwise excite.
    fn prime(&mut self, axes: &[f32; AXES]) {
        for (axis, &value) in axes.iter().enumerate() {
            if let Some(first) = self.stages[axis].first_mut() {
                first.x1 = value;
                first.x2 = value;
            }
        }
        self.primed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 100.0;

    fn make_filter() -> TremorBandFilter {
        TremorBandFilter::new(SAMPLE_RATE, &FilterConfig::default()).unwrap()
    }

    /// Run a single-axis sine through the filter and return the steady-state
    /// output amplitude on that axis (second half of the signal)
    fn response_at(filter: &mut TremorBandFilter, frequency: f32, seconds: f32) -> f32 {
        let count = (seconds * SAMPLE_RATE) as usize;
        let mut peak = 0.0f32;
        for i in 0..count {
            let t = i as f32 / SAMPLE_RATE;
            let input = Sample::new((i as u64) * 10_000, (2.0 * std::f32::consts::PI * frequency * t).sin(), 0.0, 0.0);
            let output = filter.process(input);
            if i > count / 2 {
                peak = peak.max(output.x.abs());
            }
        }
        peak
    }

    #[test]
    fn test_passband_frequency_passes() {
        let mut filter = make_filter();
        let gain = response_at(&mut filter, 6.0, 4.0);
        assert!(gain > 0.5, "6 Hz should pass the 3-12 Hz band, gain {}", gain);
    }

    #[test]
    fn test_stopband_frequencies_attenuated() {
        let mut filter = make_filter();
        let low = response_at(&mut filter, 0.5, 4.0);
        assert!(low < 0.1, "0.5 Hz drift should be attenuated, gain {}", low);

        filter.reset();
        let high = response_at(&mut filter, 30.0, 4.0);
        assert!(high < 0.1, "30 Hz noise should be attenuated, gain {}", high);
    }

    #[test]
    fn test_dc_offset_removed() {
        let mut filter = make_filter();
        let mut last = 0.0f32;
        // Constant gravity on z
        for i in 0..800u64 {
            let output = filter.process(Sample::new(i * 10_000, 0.0, 0.0, 9.81));
            last = output.z;
        }
        assert!(last.abs() < 0.01, "DC should decay to zero, got {}", last);
    }

    #[test]
    fn test_gravity_step_excites_no_transient() {
        let mut filter = make_filter();
        let mut peak_z = 0.0f32;
        // Gravity appears as a step at the first sample; priming must keep
        // the output flat instead of ringing
        for i in 0..400u64 {
            let output = filter.process(Sample::new(i * 10_000, 0.0, 0.0, 9.81));
            peak_z = peak_z.max(output.z.abs());
        }
        assert!(
            peak_z < 1e-3,
            "constant input should produce no transient, peak {}",
            peak_z
        );
    }

    #[test]
    fn test_axes_filtered_independently() {
        let mut filter = make_filter();
        let mut peak_y = 0.0f32;
        // 6 Hz on x only; y stays silent
        for i in 0..400usize {
            let t = i as f32 / SAMPLE_RATE;
            let output = filter.process(Sample::new(
                (i as u64) * 10_000,
                (2.0 * std::f32::consts::PI * 6.0 * t).sin(),
                0.0,
                0.0,
            ));
            peak_y = peak_y.max(output.y.abs());
        }
        assert_eq!(peak_y, 0.0, "silent axis must stay silent");
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = make_filter();
        for i in 0..100u64 {
            filter.process(Sample::new(i * 10_000, 1.0, 1.0, 1.0));
        }
        filter.reset();

        // After reset, a zero input must produce exactly zero output
        let output = filter.process(Sample::new(2_000_000, 0.0, 0.0, 0.0));
        assert_eq!(output.x, 0.0);
        assert_eq!(output.y, 0.0);
        assert_eq!(output.z, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let reversed = FilterConfig {
            band_low_hz: 12.0,
            band_high_hz: 3.0,
            cascade_stages: 2,
        };
        assert!(TremorBandFilter::new(SAMPLE_RATE, &reversed).is_err());

        let above_nyquist = FilterConfig {
            band_low_hz: 3.0,
            band_high_hz: 60.0,
            cascade_stages: 2,
        };
        assert!(TremorBandFilter::new(SAMPLE_RATE, &above_nyquist).is_err());

        let no_stages = FilterConfig {
            band_low_hz: 3.0,
            band_high_hz: 12.0,
            cascade_stages: 0,
        };
        assert!(TremorBandFilter::new(SAMPLE_RATE, &no_stages).is_err());
    }
}
