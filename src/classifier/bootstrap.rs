//! Bootstrap variance estimation
//!
//! Each sample resamples the word tokens of a text with replacement, rebuilds a
//! pseudo-text that keeps the original sentence endings, and runs the same
//! feature extraction and classifier as a normal analysis. Samples accumulate
//! in a caller-owned [`BootstrapSession`]; statistics are a pure reduction.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use super::features::FeatureExtractor;
use super::histogram::{histogram, HistogramBucket};
use super::model::classify;
use crate::error::{EngineError, EngineResult};
use crate::models::BootstrapSample;
use crate::text::{self, TokenizedText};

/// Draws bootstrap samples against a feature extractor
#[derive(Debug, Clone, Copy)]
pub struct BootstrapEngine<'a> {
    extractor: &'a FeatureExtractor,
    top_words: usize,
}

impl<'a> BootstrapEngine<'a> {
    pub fn new(extractor: &'a FeatureExtractor, top_words: usize) -> Self {
        Self {
            extractor,
            top_words,
        }
    }

    /// One sample using the thread-local generator
    pub fn sample(&self, text: &str) -> EngineResult<BootstrapSample> {
        self.sample_with(text, &mut rand::rng())
    }

    /// One reproducible sample
    pub fn sample_seeded(&self, text: &str, seed: u64) -> EngineResult<BootstrapSample> {
        self.sample_with(text, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> EngineResult<BootstrapSample> {
        let tokens = text::tokenize(text);
        self.sample_tokens(&tokens, rng)
    }

    pub fn sample_tokens<R: Rng + ?Sized>(
        &self,
        tokens: &TokenizedText<'_>,
        rng: &mut R,
    ) -> EngineResult<BootstrapSample> {
        if tokens.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let resampled = resample_text(tokens, rng);
        let features = self.extractor.extract(&resampled)?;
        let classification = classify(&features.feature_vector())?;

        Ok(BootstrapSample {
            entropy_score: features.entropy,
            kl_divergence: features.kl_divergence,
            avg_sentence_length: features.metrics.avg_sentence_length,
            overused_word_count: features.problematic.overused_count(),
            word_frequencies: features.distribution.top(self.top_words),
            classification,
        })
    }

    /// `n` samples in parallel. Sample `i` uses stream `i` of a ChaCha8
    /// generator seeded with `seed`, so the output does not depend on scheduling.
    pub fn run_batch(&self, text: &str, n: usize, seed: Option<u64>) -> EngineResult<Vec<BootstrapSample>> {
        self.run_batch_with_progress(text, n, seed, || {})
    }

    /// Like [`run_batch`](Self::run_batch), calling `on_sample` after each finished sample
    pub fn run_batch_with_progress<F>(
        &self,
        text: &str,
        n: usize,
        seed: Option<u64>,
        on_sample: F,
    ) -> EngineResult<Vec<BootstrapSample>>
    where
        F: Fn() + Sync,
    {
        let tokens = text::tokenize(text);
        if tokens.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        debug!("Bootstrap batch: {} samples over {} words (seed {})", n, tokens.word_count(), seed);

        (0..n)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(i as u64);
                let sample = self.sample_tokens(&tokens, &mut rng);
                on_sample();
                sample
            })
            .collect()
    }
}

/// Draw `word_count` tokens with replacement and join them into a pseudo-text.
/// A drawn token that closed a sentence in the source is followed by `.`.
pub fn resample_text<R: Rng + ?Sized>(tokens: &TokenizedText<'_>, rng: &mut R) -> String {
    let n = tokens.words.len();
    let mut out = String::with_capacity(tokens.source.len() + n);
    for k in 0..n {
        let token = &tokens.words[rng.random_range(0..n)];
        if k > 0 {
            out.push(' ');
        }
        out.push_str(token.text);
        if token.sentence_final {
            out.push('.');
        }
    }
    out
}

/// Aggregated bootstrap metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Entropy,
    KlDivergence,
    AvgSentenceLength,
    OverusedWordCount,
    ReliabilityProbability,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Entropy,
        Metric::KlDivergence,
        Metric::AvgSentenceLength,
        Metric::OverusedWordCount,
        Metric::ReliabilityProbability,
    ];

    pub fn value(&self, sample: &BootstrapSample) -> f64 {
        match self {
            Metric::Entropy => sample.entropy_score,
            Metric::KlDivergence => sample.kl_divergence,
            Metric::AvgSentenceLength => sample.avg_sentence_length,
            Metric::OverusedWordCount => sample.overused_word_count as f64,
            Metric::ReliabilityProbability => sample.classification.reliability_probability,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Entropy => "Entropy",
            Metric::KlDivergence => "KL divergence",
            Metric::AvgSentenceLength => "Avg sentence length",
            Metric::OverusedWordCount => "Overused words",
            Metric::ReliabilityProbability => "Reliability probability",
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "entropy" | "entropyscore" => Ok(Metric::Entropy),
            "kl" | "kldivergence" => Ok(Metric::KlDivergence),
            "avgsentencelength" | "sentencelength" => Ok(Metric::AvgSentenceLength),
            "overused" | "overusedwordcount" | "overusedwords" => Ok(Metric::OverusedWordCount),
            "probability" | "reliabilityprobability" => Ok(Metric::ReliabilityProbability),
            _ => Err(format!(
                "Unknown metric '{}'. Valid: entropy, kl, avgSentenceLength, overused, probability",
                s
            )),
        }
    }
}

/// Mean, standard error and 95% percentile interval of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1) over √n; 0 for a single sample
    pub std_err: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Summarize a series of values. `None` when there are none.
pub fn summarize(values: &[f64]) -> Option<MetricSummary> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let std_err = if n > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt() / (n as f64).sqrt()
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let lo = ((0.025 * n as f64) as usize).min(n - 1);
    let hi = ((0.975 * n as f64) as usize).min(n - 1);

    Some(MetricSummary {
        n,
        mean,
        std_err,
        ci_low: sorted[lo],
        ci_high: sorted[hi],
    })
}

/// Per-metric summaries of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSummary {
    pub samples: usize,
    pub entropy: MetricSummary,
    pub kl_divergence: MetricSummary,
    pub avg_sentence_length: MetricSummary,
    pub overused_word_count: MetricSummary,
    pub reliability_probability: MetricSummary,
    /// Share of samples classified as reliable
    pub reliable_share: f64,
}

impl BootstrapSummary {
    pub fn metric(&self, metric: Metric) -> &MetricSummary {
        match metric {
            Metric::Entropy => &self.entropy,
            Metric::KlDivergence => &self.kl_divergence,
            Metric::AvgSentenceLength => &self.avg_sentence_length,
            Metric::OverusedWordCount => &self.overused_word_count,
            Metric::ReliabilityProbability => &self.reliability_probability,
        }
    }
}

/// Append-only collection of bootstrap samples owned by the caller
#[derive(Debug, Clone, Default)]
pub struct BootstrapSession {
    samples: Vec<BootstrapSample>,
}

impl BootstrapSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: BootstrapSample) {
        self.samples.push(sample);
    }

    /// Append a whole batch in one step
    pub fn extend(&mut self, batch: Vec<BootstrapSample>) {
        self.samples.extend(batch);
    }

    pub fn samples(&self) -> &[BootstrapSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.samples.iter().map(|s| metric.value(s)).collect()
    }

    pub fn summary(&self) -> Option<BootstrapSummary> {
        if self.samples.is_empty() {
            return None;
        }
        let reliable = self
            .samples
            .iter()
            .filter(|s| s.classification.is_reliable())
            .count();

        Some(BootstrapSummary {
            samples: self.samples.len(),
            entropy: summarize(&self.values(Metric::Entropy))?,
            kl_divergence: summarize(&self.values(Metric::KlDivergence))?,
            avg_sentence_length: summarize(&self.values(Metric::AvgSentenceLength))?,
            overused_word_count: summarize(&self.values(Metric::OverusedWordCount))?,
            reliability_probability: summarize(&self.values(Metric::ReliabilityProbability))?,
            reliable_share: reliable as f64 / self.samples.len() as f64,
        })
    }

    pub fn histogram(&self, metric: Metric, buckets: usize) -> Vec<HistogramBucket> {
        histogram(&self.values(metric), buckets)
    }
}
