//! Feature extraction for reliability classification
//!
//! Turns a text into its metrics, word distribution, Shannon entropy, KL
//! divergence against the reference model, and the overused / loaded words.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::config::{AnalysisConfig, OveruseConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{ProblematicElements, TextMetrics, WordFrequencyDistribution};
use crate::reference::{ReferenceModel, SmoothedReference};
use crate::text::{self, Lexicon, StopWordPolicy, TokenizedText};

/// Classifier inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub entropy: f64,
    pub kl_divergence: f64,
    pub overused_words: usize,
    pub suspicious_words: usize,
    pub avg_sentence_length: f64,
}

/// Everything derived from one text
#[derive(Debug, Clone)]
pub struct TextFeatures {
    pub metrics: TextMetrics,
    /// Full distribution (stop-word policy applied)
    pub distribution: WordFrequencyDistribution,
    /// Shannon entropy in bits
    pub entropy: f64,
    /// KL divergence from the reference, in nats
    pub kl_divergence: f64,
    pub problematic: ProblematicElements,
}

impl TextFeatures {
    pub fn feature_vector(&self) -> FeatureVector {
        FeatureVector {
            entropy: self.entropy,
            kl_divergence: self.kl_divergence,
            overused_words: self.problematic.overused_count(),
            suspicious_words: self.problematic.suspicious_count(),
            avg_sentence_length: self.metrics.avg_sentence_length,
        }
    }
}

/// H = −Σ p·log₂ p over the distribution's own words
pub fn shannon_entropy(distribution: &WordFrequencyDistribution) -> f64 {
    let total = distribution.total();
    if total == 0 {
        return 0.0;
    }
    let h: f64 = distribution
        .entries()
        .iter()
        .map(|e| {
            let p = e.count as f64 / total as f64;
            -p * p.log2()
        })
        .sum();
    // A single word yields -0.0; NaN passes through to the classifier
    if h <= 0.0 {
        0.0
    } else {
        h
    }
}

/// D(P‖Q') = Σ_{w∈P} P(w)·ln(P(w)/Q'(w)). Rounding below 0 is clamped; NaN is kept.
pub fn kl_divergence(distribution: &WordFrequencyDistribution, reference: &SmoothedReference<'_>) -> f64 {
    let total = distribution.total();
    if total == 0 {
        return 0.0;
    }
    let d: f64 = distribution
        .entries()
        .iter()
        .map(|e| {
            let p = e.count as f64 / total as f64;
            p * (p / reference.probability(&e.word)).ln()
        })
        .sum();
    if d < 0.0 {
        0.0
    } else {
        d
    }
}

/// Extracts [`TextFeatures`] against a fixed reference model and lexicon
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    reference: Arc<ReferenceModel>,
    lexicon: Arc<Lexicon>,
    stop_words: StopWordPolicy,
    overuse: OveruseConfig,
    smoothing: f64,
}

impl FeatureExtractor {
    /// The reference model is filtered with the configured stop-word policy here,
    /// so both distributions are always compared over the same vocabulary rules.
    ///
    /// `config` is taken as is. Out-of-range values (such as a NaN smoothing
    /// constant) surface as [`EngineError::InvalidFeatureInput`] when classifying.
    pub fn new(config: &AnalysisConfig, reference: &ReferenceModel, lexicon: Arc<Lexicon>) -> Self {
        let policy = config.vocabulary.stop_words;
        Self {
            reference: Arc::new(reference.filtered(policy, &lexicon)),
            lexicon,
            stop_words: policy,
            overuse: config.overuse.clone(),
            smoothing: config.divergence.smoothing,
        }
    }

    pub fn reference(&self) -> &ReferenceModel {
        &self.reference
    }

    pub fn stop_word_policy(&self) -> StopWordPolicy {
        self.stop_words
    }

    /// Tokenize and extract. Texts without a single word are rejected.
    pub fn extract(&self, text: &str) -> EngineResult<TextFeatures> {
        let tokens = text::tokenize(text);
        self.extract_tokens(&tokens)
    }

    pub fn extract_tokens(&self, tokens: &TokenizedText<'_>) -> EngineResult<TextFeatures> {
        if tokens.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let metrics = tokens.metrics();
        let words = tokens.lowercase_words();

        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for w in &words {
            *counts.entry(w.as_str()).or_insert(0) += 1;
        }

        let distribution = WordFrequencyDistribution::from_counts(
            counts
                .iter()
                .filter(|(w, _)| {
                    self.stop_words == StopWordPolicy::Include || !self.lexicon.is_stop_word(w)
                })
                .map(|(w, c)| (w.to_string(), *c)),
        );

        // Support is the filtered vocabulary, matching the filtered reference
        let smoothed = self.reference.smoothed(self.smoothing, distribution.words());

        let entropy = shannon_entropy(&distribution);
        let kl_divergence = kl_divergence(&distribution, &smoothed);

        let problematic = ProblematicElements {
            overused_words: self.overused_words(&counts, words.len(), &smoothed),
            suspicious_words: self.lexicon.find_loaded_terms(&words),
        };

        Ok(TextFeatures {
            metrics,
            distribution,
            entropy,
            kl_divergence,
            problematic,
        })
    }

    /// Words whose share of the text exceeds `ratio` × their smoothed reference share
    fn overused_words(
        &self,
        counts: &FxHashMap<&str, usize>,
        total: usize,
        reference: &SmoothedReference<'_>,
    ) -> std::collections::BTreeSet<String> {
        counts
            .iter()
            .filter(|(w, &c)| {
                c >= self.overuse.min_occurrences
                    && w.chars().count() >= self.overuse.min_word_length
                    && !self.lexicon.is_stop_word(w)
            })
            .filter(|(w, &c)| {
                let observed = c as f64 / total as f64;
                observed > self.overuse.ratio * reference.probability(w)
            })
            .map(|(w, _)| w.to_string())
            .collect()
    }
}
