//! Core data models for veracity
//!
//! These values are produced fresh for every analysis call and are never
//! mutated afterwards. JSON field names are camelCase so that UI consumers
//! can use them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::classifier::BootstrapSummary;

/// Basic counts derived from a tokenized text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub word_count: usize,
    /// Distinct words, compared case-insensitively
    pub unique_word_count: usize,
    pub sentence_count: usize,
    /// `word_count / sentence_count`, or 0 when there are no sentences
    pub avg_sentence_length: f64,
}

impl TextMetrics {
    pub fn from_counts(word_count: usize, unique_word_count: usize, sentence_count: usize) -> Self {
        let avg_sentence_length = if sentence_count == 0 {
            0.0
        } else {
            word_count as f64 / sentence_count as f64
        };
        Self {
            word_count,
            unique_word_count,
            sentence_count,
            avg_sentence_length,
        }
    }

    /// Unique words over total words (0 for an empty text)
    pub fn lexical_diversity(&self) -> f64 {
        if self.word_count == 0 {
            0.0
        } else {
            self.unique_word_count as f64 / self.word_count as f64
        }
    }
}

/// One row of a word frequency distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
    /// Share of the distribution's total, in percent
    pub percentage: f64,
}

/// Word frequencies ordered by count (descending), ties broken alphabetically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WordFrequencyDistribution {
    entries: Vec<WordFrequency>,
    /// Number of words the percentages are relative to
    total: usize,
}

impl WordFrequencyDistribution {
    /// Build a distribution from (word, count) pairs. Zero counts are dropped.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let mut entries: Vec<(String, usize)> =
            counts.into_iter().filter(|(_, c)| *c > 0).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let total: usize = entries.iter().map(|(_, c)| c).sum();

        let entries = entries
            .into_iter()
            .map(|(word, count)| WordFrequency {
                percentage: count as f64 / total as f64 * 100.0,
                word,
                count,
            })
            .collect();

        Self { entries, total }
    }

    /// Build from explicit percentages (used for the reference comparison view)
    pub fn from_percentages(rows: Vec<(String, f64)>) -> Self {
        let entries = rows
            .into_iter()
            .map(|(word, percentage)| WordFrequency {
                word,
                count: 0,
                percentage,
            })
            .collect();
        Self { entries, total: 0 }
    }

    pub fn entries(&self) -> &[WordFrequency] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The `n` most frequent words. Percentages stay relative to the full total.
    pub fn top(&self, n: usize) -> Self {
        Self {
            entries: self.entries.iter().take(n).cloned().collect(),
            total: self.total,
        }
    }

    /// Probability (0..=1) of a word under this distribution
    pub fn probability(&self, word: &str) -> f64 {
        self.entries
            .iter()
            .find(|e| e.word == word)
            .map(|e| e.percentage / 100.0)
            .unwrap_or(0.0)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.word.as_str())
    }
}

/// Words flagged by the feature extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProblematicElements {
    /// Lowercase words used far more often than the reference predicts
    #[serde(default)]
    pub overused_words: BTreeSet<String>,
    /// Lowercase loaded-language lexicon entries found in the text
    #[serde(default)]
    pub suspicious_words: BTreeSet<String>,
}

impl ProblematicElements {
    pub fn is_empty(&self) -> bool {
        self.overused_words.is_empty() && self.suspicious_words.is_empty()
    }

    pub fn overused_count(&self) -> usize {
        self.overused_words.len()
    }

    pub fn suspicious_count(&self) -> usize {
        self.suspicious_words.len()
    }
}

/// Verdict of the reliability classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Likely Reliable")]
    Reliable,
    #[serde(rename = "Potentially Misleading")]
    Misleading,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Reliable => write!(f, "Likely Reliable"),
            Classification::Misleading => write!(f, "Potentially Misleading"),
        }
    }
}

/// Output of the logistic model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub logit_score: f64,
    pub reliability_probability: f64,
    pub classification: Classification,
    /// In [0.5, 0.99]
    pub confidence: f64,
}

/// Coarse confidence band used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ClassificationResult {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        if self.confidence > 0.8 {
            ConfidenceLevel::High
        } else if self.confidence > 0.6 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn is_reliable(&self) -> bool {
        self.classification == Classification::Reliable
    }
}

/// One re-derivation of the features from a resampled text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSample {
    pub entropy_score: f64,
    pub kl_divergence: f64,
    pub avg_sentence_length: f64,
    pub overused_word_count: usize,
    pub word_frequencies: WordFrequencyDistribution,
    pub classification: ClassificationResult,
}

/// Why a span was highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Overused,
    Suspicious,
}

/// A highlighted region of the original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSpan {
    /// The problematic term as flagged (lowercase)
    pub word: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// The exact source substring
    pub matched: String,
    pub kind: AnnotationKind,
    pub explanation: String,
}

/// Where a URL input came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub url: String,
    pub host: String,
}

/// Full result of an `Analyze` call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub classification: Classification,
    pub reliability_probability: f64,
    pub confidence: f64,
    pub logit_score: f64,
    pub entropy_score: f64,
    pub kl_divergence: f64,
    pub text_metrics: TextMetrics,
    pub word_frequencies: WordFrequencyDistribution,
    pub reference_frequencies: WordFrequencyDistribution,
    pub problematic_elements: ProblematicElements,
    pub original_text: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
}

impl AnalysisResult {
    /// Classifier view of this result, for consumers that re-render it
    pub fn classification_result(&self) -> ClassificationResult {
        ClassificationResult {
            logit_score: self.logit_score,
            reliability_probability: self.reliability_probability,
            classification: self.classification,
            confidence: self.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_avg_sentence_length() {
        let m = TextMetrics::from_counts(10, 7, 4);
        assert_eq!(m.avg_sentence_length, 2.5);
        assert_eq!(TextMetrics::from_counts(3, 3, 0).avg_sentence_length, 0.0);
    }

    #[test]
    fn test_distribution_ordering_and_percentages() {
        let dist = WordFrequencyDistribution::from_counts(vec![
            ("fox".to_string(), 1),
            ("the".to_string(), 3),
            ("quick".to_string(), 1),
        ]);
        let words: Vec<&str> = dist.words().collect();
        assert_eq!(words, vec!["the", "fox", "quick"]);
        let sum: f64 = dist.entries().iter().map(|e| e.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(dist.total(), 5);
        assert!((dist.probability("the") - 0.6).abs() < 1e-12);
        assert_eq!(dist.probability("missing"), 0.0);
    }

    #[test]
    fn test_top_keeps_total() {
        let dist = WordFrequencyDistribution::from_counts(vec![
            ("a".to_string(), 5),
            ("b".to_string(), 3),
            ("c".to_string(), 2),
        ]);
        let top = dist.top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top.total(), 10);
        assert_eq!(top.entries()[1].percentage, 30.0);
    }

    #[test]
    fn test_classification_serializes_display_label() {
        let json = serde_json::to_string(&Classification::Misleading).unwrap();
        assert_eq!(json, "\"Potentially Misleading\"");
    }

    #[test]
    fn test_confidence_level_bands() {
        let mut r = ClassificationResult {
            logit_score: 0.0,
            reliability_probability: 0.5,
            classification: Classification::Reliable,
            confidence: 0.5,
        };
        assert_eq!(r.confidence_level(), ConfidenceLevel::Low);
        r.confidence = 0.7;
        assert_eq!(r.confidence_level(), ConfidenceLevel::Medium);
        r.confidence = 0.95;
        assert_eq!(r.confidence_level(), ConfidenceLevel::High);
    }
}
