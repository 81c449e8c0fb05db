// Classifier - threshold-based tremor severity classification
//
// Maps one FeatureVector to a Classification using fixed thresholds
// calibrated against the 3-12 Hz tremor band and RMS amplitude cutoffs.
// The classifier is a stateless pure function: identical input always
// yields identical output.
//
// Decision rules:
// 1. Tremor is present when the dominant frequency lies inside the band,
//    the band power ratio reaches min_band_ratio, and the RMS amplitude
//    reaches the mild floor.
// 2. Severity buckets by RMS amplitude; every floor is inclusive, so a
//    value sitting exactly on a boundary resolves to the higher bucket.
// 3. Confidence is the weakest of the three evidence terms (frequency,
//    band ratio, amplitude), each scaled so its threshold maps to 0.5.

use serde::{Deserialize, Serialize};

use crate::analysis::features::FeatureVector;
use crate::config::ClassifierConfig;

/// Ordered tremor severity buckets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No tremor detected
    None,
    /// Detectable but low-amplitude tremor
    Mild,
    /// Clearly visible tremor
    Moderate,
    /// Large-amplitude tremor
    Severe,
}

impl Severity {
    /// Numeric rank used for session averaging (None = 0 .. Severe = 3)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::None => 0,
            Severity::Mild => 1,
            Severity::Moderate => 2,
            Severity::Severe => 3,
        }
    }

    /// Bucket for a numeric rank, rounding toward the nearer bucket
    pub fn from_rank(rank: f64) -> Self {
        match rank.round() as i64 {
            i64::MIN..=0 => Severity::None,
            1 => Severity::Mild,
            2 => Severity::Moderate,
            _ => Severity::Severe,
        }
    }
}

/// Result of classifying one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the window contains tremor
    pub present: bool,
    /// Severity bucket (None when not present)
    pub severity: Severity,
    /// Confidence in the decision (0.0 to 1.0)
    pub confidence: f32,
    /// UPDRS-style tremor score (0-4)
    ///
    /// 0 = no tremor, 1 = slight, 2 = mild, 3 = moderate, 4 = severe,
    /// following the Unified Parkinson's Disease Rating Scale convention.
    pub updrs_score: u8,
}

/// Classifier applies fixed thresholds to window features
pub struct Classifier {
    config: ClassifierConfig,
    band_low_hz: f32,
    band_high_hz: f32,
}

impl Classifier {
    /// Create a classifier
    ///
    /// # Arguments
    /// * `config` - Amplitude floors and band-ratio threshold
    /// * `band_low_hz` / `band_high_hz` - Tremor band the dominant
    ///   frequency must fall into
    pub fn new(config: ClassifierConfig, band_low_hz: f32, band_high_hz: f32) -> Self {
        Self {
            config,
            band_low_hz,
            band_high_hz,
        }
    }

    /// Classify one feature vector
    ///
    /// Pure function of its input: no internal state is read or written.
    pub fn classify(&self, features: &FeatureVector) -> Classification {
        let freq_in_band = features.dominant_frequency_hz >= self.band_low_hz
            && features.dominant_frequency_hz <= self.band_high_hz;
        let present = freq_in_band
            && features.band_power_ratio >= self.config.min_band_ratio
            && features.amplitude_rms >= self.config.amp_mild_floor;

        let severity = self.severity_bucket(present, features.amplitude_rms);
        let confidence = self.confidence(present, freq_in_band, features);
        let updrs_score = self.updrs_score(present, features.amplitude_rms);

        Classification {
            present,
            severity,
            confidence,
            updrs_score,
        }
    }

    /// Bucket RMS amplitude into severity; floors are inclusive so boundary
    /// values resolve toward the higher bucket
    fn severity_bucket(&self, present: bool, rms: f32) -> Severity {
        if !present {
            Severity::None
        } else if rms >= self.config.amp_severe_floor {
            Severity::Severe
        } else if rms >= self.config.amp_moderate_floor {
            Severity::Moderate
        } else {
            Severity::Mild
        }
    }

    /// Weakest-link confidence: each evidence term is scaled so that its
    /// decision threshold maps to 0.5
    fn confidence(&self, present: bool, freq_in_band: bool, features: &FeatureVector) -> f32 {
        let band_evidence =
            (features.band_power_ratio / self.config.min_band_ratio * 0.5).clamp(0.0, 1.0);
        let amp_evidence =
            (features.amplitude_rms / self.config.amp_mild_floor * 0.5).clamp(0.0, 1.0);
        let freq_evidence = if freq_in_band { 1.0 } else { 0.0 };

        let evidence = band_evidence.min(amp_evidence).min(freq_evidence);
        if present {
            evidence
        } else {
            1.0 - evidence
        }
    }

    /// UPDRS-style 0-4 score from RMS amplitude
    fn updrs_score(&self, present: bool, rms: f32) -> u8 {
        if !present {
            0
        } else if rms < self.config.amp_slight_ceiling {
            1
        } else if rms < self.config.amp_moderate_floor {
            2
        } else if rms < self.config.amp_severe_floor {
            3
        } else {
            4
        }
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
