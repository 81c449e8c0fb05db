// Classifier unit tests

use super::*;

/// Classifier with default thresholds over the default band
fn make_classifier() -> Classifier {
    Classifier::new(ClassifierConfig::default(), 3.0, 12.0)
}

fn features(frequency: f32, ratio: f32, rms: f32) -> FeatureVector {
    FeatureVector {
        dominant_frequency_hz: frequency,
        band_power_ratio: ratio,
        amplitude_rms: rms,
    }
}

#[test]
fn test_clear_tremor_detected() {
    let classifier = make_classifier();
    let result = classifier.classify(&features(6.0, 0.85, 0.20));

    assert!(result.present);
    assert_eq!(result.severity, Severity::Moderate);
    assert!(result.confidence >= 0.5);
    assert_eq!(result.updrs_score, 3);
}

#[test]
fn test_quiet_signal_not_tremor() {
    let classifier = make_classifier();
    // Strong band ratio but amplitude below the mild floor
    let result = classifier.classify(&features(6.0, 0.9, 0.01));

    assert!(!result.present);
    assert_eq!(result.severity, Severity::None);
    assert_eq!(result.updrs_score, 0);
}

#[test]
fn test_out_of_band_frequency_not_tremor() {
    let classifier = make_classifier();
    // Walking cadence at ~2 Hz with plenty of amplitude
    let result = classifier.classify(&features(2.0, 0.6, 0.5));

    assert!(!result.present);
    assert_eq!(result.severity, Severity::None);
    assert!(result.confidence >= 0.5, "out-of-band frequency is strong absence evidence");
}

#[test]
fn test_low_band_ratio_not_tremor() {
    let classifier = make_classifier();
    // Broadband movement: in-band dominant frequency but diffuse spectrum
    let result = classifier.classify(&features(6.0, 0.2, 0.5));

    assert!(!result.present);
    assert_eq!(result.severity, Severity::None);
}

#[test]
fn test_severity_buckets() {
    let classifier = make_classifier();
    let config = ClassifierConfig::default();

    let mild = classifier.classify(&features(6.0, 0.8, config.amp_mild_floor + 0.01));
    assert_eq!(mild.severity, Severity::Mild);

    let moderate = classifier.classify(&features(6.0, 0.8, config.amp_moderate_floor + 0.01));
    assert_eq!(moderate.severity, Severity::Moderate);

    let severe = classifier.classify(&features(6.0, 0.8, config.amp_severe_floor + 0.1));
    assert_eq!(severe.severity, Severity::Severe);
}

#[test]
fn test_boundary_values_resolve_to_higher_bucket() {
    let classifier = make_classifier();
    let config = ClassifierConfig::default();

    // Exactly on a floor lands in that floor's bucket, never below it
    let at_mild = classifier.classify(&features(6.0, 0.8, config.amp_mild_floor));
    assert!(at_mild.present);
    assert_eq!(at_mild.severity, Severity::Mild);

    let at_moderate = classifier.classify(&features(6.0, 0.8, config.amp_moderate_floor));
    assert_eq!(at_moderate.severity, Severity::Moderate);

    let at_severe = classifier.classify(&features(6.0, 0.8, config.amp_severe_floor));
    assert_eq!(at_severe.severity, Severity::Severe);
}

#[test]
fn test_band_edges_are_inclusive() {
    let classifier = make_classifier();

    let at_low_edge = classifier.classify(&features(3.0, 0.8, 0.2));
    assert!(at_low_edge.present);

    let at_high_edge = classifier.classify(&features(12.0, 0.8, 0.2));
    assert!(at_high_edge.present);

    let below = classifier.classify(&features(2.99, 0.8, 0.2));
    assert!(!below.present);
}

#[test]
fn test_classifier_is_deterministic() {
    let classifier = make_classifier();
    let input = features(5.5, 0.72, 0.18);

    let first = classifier.classify(&input);
    let second = classifier.classify(&input);
    assert_eq!(first, second, "identical features must yield identical classification");
}

#[test]
fn test_confidence_in_valid_range() {
    let classifier = make_classifier();
    let cases = [
        features(6.0, 0.9, 0.5),
        features(6.0, 0.4, 0.05),
        features(2.0, 0.1, 0.01),
        features(12.0, 1.0, 10.0),
        features(0.0, 0.0, 0.0),
    ];

    for case in &cases {
        let result = classifier.classify(case);
        assert!(
            (0.0..=1.0).contains(&result.confidence),
            "confidence {} out of range for {:?}",
            result.confidence,
            case
        );
    }
}

#[test]
fn test_updrs_score_mapping() {
    let classifier = make_classifier();
    let config = ClassifierConfig::default();

    assert_eq!(classifier.classify(&features(2.0, 0.1, 0.0)).updrs_score, 0);
    assert_eq!(
        classifier
            .classify(&features(6.0, 0.8, config.amp_mild_floor))
            .updrs_score,
        1,
        "below the slight ceiling scores 1"
    );
    assert_eq!(
        classifier
            .classify(&features(6.0, 0.8, config.amp_slight_ceiling))
            .updrs_score,
        2
    );
    assert_eq!(
        classifier
            .classify(&features(6.0, 0.8, config.amp_moderate_floor))
            .updrs_score,
        3
    );
    assert_eq!(
        classifier
            .classify(&features(6.0, 0.8, config.amp_severe_floor))
            .updrs_score,
        4
    );
}

#[test]
fn test_severity_ordering() {
    assert!(Severity::None < Severity::Mild);
    assert!(Severity::Mild < Severity::Moderate);
    assert!(Severity::Moderate < Severity::Severe);

    assert_eq!(Severity::None.rank(), 0);
    assert_eq!(Severity::Severe.rank(), 3);
    assert_eq!(Severity::from_rank(0.4), Severity::None);
    assert_eq!(Severity::from_rank(1.6), Severity::Moderate);
    assert_eq!(Severity::from_rank(9.0), Severity::Severe);
}

#[test]
fn test_severity_serde_lowercase() {
    let json = serde_json::to_string(&Severity::Moderate).unwrap();
    assert_eq!(json, "\"moderate\"");
    let parsed: Severity = serde_json::from_str("\"severe\"").unwrap();
    assert_eq!(parsed, Severity::Severe);
}
