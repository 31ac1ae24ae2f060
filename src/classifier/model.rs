//! Fixed-weight logistic reliability model
//!
//! z = β₀ + β₁·entropy + β₂·KL + β₃·(overused/10) + β₄·suspicious + β₅·sentenceLengthScore
//!
//! This is the single implementation of the classifier math; every consumer
//! (analysis, bootstrap, re-rendered views) calls [`classify`].

use super::features::FeatureVector;
use crate::error::{EngineError, EngineResult};
use crate::models::{Classification, ClassificationResult};

/// Sentence length (words) the model treats as ideal
pub const IDEAL_SENTENCE_LENGTH: f64 = 17.5;
/// Divisor bringing the sentence-length deviation into the range of the other terms
pub const SENTENCE_LENGTH_SCALE: f64 = 10.0;
/// Divisor applied to the overused-word count
pub const OVERUSED_SCALE: f64 = 10.0;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Largest f64 below 0.5
const JUST_BELOW_HALF: f64 = 0.5 - f64::EPSILON / 4.0;

/// Logistic model coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub intercept: f64,
    pub entropy: f64,
    pub kl_divergence: f64,
    pub overused_words: f64,
    pub suspicious_words: f64,
    pub sentence_length: f64,
}

/// The fitted coefficient set
pub const COEFFICIENTS: Coefficients = Coefficients {
    intercept: 1.217970,
    entropy: 0.600971,
    kl_divergence: -1.847155,
    overused_words: -1.318058,
    suspicious_words: -1.026311,
    sentence_length: -2.889868,
};

/// |avg − 17.5| / 10
pub fn sentence_length_score(avg_sentence_length: f64) -> f64 {
    (avg_sentence_length - IDEAL_SENTENCE_LENGTH).abs() / SENTENCE_LENGTH_SCALE
}

fn finite(feature: &'static str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::InvalidFeatureInput { feature, value })
    }
}

/// Linear predictor for a feature vector
pub fn logit(features: &FeatureVector) -> EngineResult<f64> {
    let entropy = finite("entropy", features.entropy)?;
    let kl = finite("kl_divergence", features.kl_divergence)?;
    let avg_len = finite("avg_sentence_length", features.avg_sentence_length)?;
    let c = &COEFFICIENTS;

    let z = c.intercept
        + c.entropy * entropy
        + c.kl_divergence * kl
        + c.overused_words * (features.overused_words as f64 / OVERUSED_SCALE)
        + c.suspicious_words * features.suspicious_words as f64
        + c.sentence_length * sentence_length_score(avg_len);

    finite("logit", z)
}

/// Numerically stable logistic function
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// min(0.99, 0.5 + 0.1·|z|)
pub fn confidence(z: f64) -> f64 {
    (0.5 + 0.1 * z.abs()).min(MAX_CONFIDENCE)
}

/// Turn a logit into a full classification
pub fn classify_logit(z: f64) -> EngineResult<ClassificationResult> {
    let z = finite("logit", z)?;
    let mut probability = sigmoid(z);
    let classification = if z >= 0.0 {
        Classification::Reliable
    } else {
        // Tiny negative logits round to exactly 0.5; keep them on the misleading side
        probability = probability.min(JUST_BELOW_HALF);
        Classification::Misleading
    };

    Ok(ClassificationResult {
        logit_score: z,
        reliability_probability: probability,
        classification,
        confidence: confidence(z),
    })
}

/// Classify a feature vector
pub fn classify(features: &FeatureVector) -> EngineResult<ClassificationResult> {
    classify_logit(logit(features)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(entropy: f64, kl: f64, overused: usize, suspicious: usize, avg: f64) -> FeatureVector {
        FeatureVector {
            entropy,
            kl_divergence: kl,
            overused_words: overused,
            suspicious_words: suspicious,
            avg_sentence_length: avg,
        }
    }

    #[test]
    fn test_logit_matches_formula() {
        let f = features(4.0, 0.5, 3, 2, 12.5);
        let expected = 1.217970 + 0.600971 * 4.0 - 1.847155 * 0.5 - 1.318058 * 0.3
            - 1.026311 * 2.0
            - 2.889868 * 0.5;
        assert!((logit(&f).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ideal_sentence_length_has_no_penalty() {
        assert_eq!(sentence_length_score(17.5), 0.0);
        assert_eq!(sentence_length_score(7.5), 1.0);
        assert_eq!(sentence_length_score(27.5), 1.0);
    }

    #[test]
    fn test_probability_is_sigmoid_and_side_matches() {
        let mut z = -12.0;
        while z <= 12.0 {
            let r = classify_logit(z).unwrap();
            assert!((r.reliability_probability - 1.0 / (1.0 + (-z).exp())).abs() < 1e-12);
            assert_eq!(r.classification == Classification::Reliable, z >= 0.0);
            assert_eq!(r.reliability_probability >= 0.5, z >= 0.0);
            z += 0.37;
        }
    }

    #[test]
    fn test_tiny_negative_logit_stays_misleading() {
        for z in [-1e-17, -f64::MIN_POSITIVE, -1e-300] {
            let r = classify_logit(z).unwrap();
            assert_eq!(r.classification, Classification::Misleading);
            assert!(r.reliability_probability < 0.5);
        }
        let r = classify_logit(0.0).unwrap();
        assert_eq!(r.classification, Classification::Reliable);
        assert_eq!(r.reliability_probability, 0.5);
    }

    #[test]
    fn test_confidence_bounds_and_monotonicity() {
        let mut prev = 0.0;
        for i in 0..200 {
            let z = i as f64 * 0.05;
            let c = confidence(z);
            assert!((0.5..=0.99).contains(&c));
            assert_eq!(c, confidence(-z));
            assert!(c >= prev);
            prev = c;
        }
        assert_eq!(confidence(100.0), 0.99);
        assert_eq!(confidence(0.0), 0.5);
    }

    #[test]
    fn test_extreme_logits_do_not_overflow() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_are_rejected() {
        let err = classify(&features(f64::NAN, 0.1, 0, 0, 10.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFeatureInput { feature: "entropy", .. }));

        let err = classify(&features(3.0, f64::INFINITY, 0, 0, 10.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFeatureInput { feature: "kl_divergence", .. }));

        let err = classify(&features(3.0, 0.1, 0, 0, f64::NEG_INFINITY)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidFeatureInput { feature: "avg_sentence_length", .. }
        ));

        assert!(classify_logit(f64::NAN).is_err());
    }

    #[test]
    fn test_suspicious_words_push_towards_misleading() {
        let clean = classify(&features(6.0, 0.3, 0, 0, 17.5)).unwrap();
        let loaded = classify(&features(6.0, 0.3, 0, 6, 17.5)).unwrap();
        assert!(loaded.logit_score < clean.logit_score);
        assert!(clean.is_reliable());
        assert!(!loaded.is_reliable());
    }
}
