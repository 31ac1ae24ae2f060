//! Analysis facade
//!
//! Wires the tokenizer, feature extractor, classifier, bootstrap engine and
//! annotator together behind the `Analyze` / `Bootstrap` contract. An
//! [`Analyzer`] is immutable after construction and can be shared freely.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::annotate::{annotate, Annotation};
use crate::classifier::{classify, BootstrapEngine, BootstrapSession, FeatureExtractor};
use crate::config::AnalysisConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AnalysisResult, BootstrapSample, ProblematicElements, SourceMetadata};
use crate::reference::ReferenceModel;
use crate::source::{host_of, HttpFetcher, SourceFetcher};
use crate::text::{self, Lexicon};

/// Entropy (bits) below which a text reads as repetitive
pub const LOW_ENTROPY_THRESHOLD: f64 = 3.5;
/// KL divergence (nats) above which the vocabulary reads as atypical
pub const HIGH_DIVERGENCE_THRESHOLD: f64 = 0.5;

/// What to analyze: raw text or a URL that resolves to text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisInput {
    Text { text: String },
    Url { url: String },
}

impl AnalysisInput {
    pub fn text(text: impl Into<String>) -> Self {
        AnalysisInput::Text { text: text.into() }
    }

    pub fn url(url: impl Into<String>) -> Self {
        AnalysisInput::Url { url: url.into() }
    }
}

/// Plain-language reading of entropy and KL divergence
pub fn details(entropy: f64, kl_divergence: f64) -> String {
    let diversity = if entropy < LOW_ENTROPY_THRESHOLD {
        "The text shows low lexical diversity, which is often characteristic of repetitive content."
    } else {
        "The text shows normal lexical diversity, similar to standard journalistic writing."
    };
    let divergence = if kl_divergence > HIGH_DIVERGENCE_THRESHOLD {
        "The word distribution differs significantly from typical reliable sources."
    } else {
        "The word distribution is consistent with typical reliable sources."
    };
    format!("{} {}", diversity, divergence)
}

pub struct Analyzer {
    config: AnalysisConfig,
    extractor: FeatureExtractor,
    fetcher: Box<dyn SourceFetcher>,
}

impl Analyzer {
    /// Build from already-loaded data. `config` is not validated here; use
    /// [`Analyzer::from_config`] for settings that come from outside.
    pub fn new(config: AnalysisConfig, reference: &ReferenceModel, lexicon: Lexicon) -> Self {
        let extractor = FeatureExtractor::new(&config, reference, Arc::new(lexicon));
        Self {
            config,
            extractor,
            fetcher: Box::new(HttpFetcher::new()),
        }
    }

    /// Validate the configuration and build from it, loading replacement data files it names
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let reference = match config.reference_path() {
            Some(path) => ReferenceModel::load(&path)?,
            None => ReferenceModel::builtin(),
        };
        let lexicon = match config.lexicon_path() {
            Some(path) => Lexicon::builtin().with_loaded_terms_file(&path)?,
            None => Lexicon::builtin(),
        };
        debug!(
            "Analyzer ready: {} reference words, {} loaded terms, stop words {:?}",
            reference.vocabulary_size(),
            lexicon.loaded_terms().len(),
            config.vocabulary.stop_words
        );
        Ok(Self::new(config, &reference, lexicon))
    }

    /// Replace the URL resolver
    pub fn with_fetcher(mut self, fetcher: impl SourceFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn bootstrap_engine(&self) -> BootstrapEngine<'_> {
        BootstrapEngine::new(&self.extractor, self.config.display.top_words)
    }

    pub fn analyze(&self, input: &AnalysisInput) -> EngineResult<AnalysisResult> {
        match input {
            AnalysisInput::Text { text } => self.analyze_text(text),
            AnalysisInput::Url { url } => {
                let text = self.resolve_url(url)?;
                let mut result = self.analyze_text(&text)?;
                result.source = Some(SourceMetadata {
                    url: url.clone(),
                    host: host_of(url).unwrap_or_default(),
                });
                Ok(result)
            }
        }
    }

    /// Fetch a URL's text. A source that answers with blank text is malformed, not empty input.
    pub fn resolve_url(&self, url: &str) -> EngineResult<String> {
        let text = self.fetcher.fetch(url)?;
        if text::is_blank(&text) {
            return Err(EngineError::MalformedResponse(format!("{} returned no text", url)));
        }
        Ok(text)
    }

    pub fn analyze_text(&self, text: &str) -> EngineResult<AnalysisResult> {
        if text::is_blank(text) {
            return Err(EngineError::EmptyInput);
        }
        let start = Instant::now();

        let tokens = text::tokenize(text);
        let features = self.extractor.extract_tokens(&tokens)?;
        let classification = classify(&features.feature_vector())?;

        let word_frequencies = features.distribution.top(self.config.display.top_words);
        let reference_frequencies = self
            .extractor
            .reference()
            .comparison_distribution(word_frequencies.words());

        let bootstrap = if self.config.bootstrap.samples > 0 {
            let batch = self.bootstrap_engine().run_batch(
                text,
                self.config.bootstrap.samples,
                self.config.bootstrap.seed,
            )?;
            let mut session = BootstrapSession::new();
            session.extend(batch);
            session.summary()
        } else {
            None
        };

        info!(
            "Analyzed {} words: {} (p = {:.3})",
            features.metrics.word_count, classification.classification, classification.reliability_probability
        );
        debug!("Analysis took {:?}", start.elapsed());

        Ok(AnalysisResult {
            classification: classification.classification,
            reliability_probability: classification.reliability_probability,
            confidence: classification.confidence,
            logit_score: classification.logit_score,
            entropy_score: features.entropy,
            kl_divergence: features.kl_divergence,
            text_metrics: features.metrics,
            word_frequencies,
            reference_frequencies,
            problematic_elements: features.problematic,
            original_text: text.to_string(),
            details: details(features.entropy, features.kl_divergence),
            bootstrap,
            source: None,
        })
    }

    /// One bootstrap sample; reproducible when `seed` is given
    pub fn bootstrap(&self, text: &str, seed: Option<u64>) -> EngineResult<BootstrapSample> {
        if text::is_blank(text) {
            return Err(EngineError::EmptyInput);
        }
        let engine = self.bootstrap_engine();
        match seed {
            Some(seed) => engine.sample_seeded(text, seed),
            None => engine.sample(text),
        }
    }

    pub fn bootstrap_batch(&self, text: &str, samples: usize, seed: Option<u64>) -> EngineResult<Vec<BootstrapSample>> {
        self.bootstrap_engine().run_batch(text, samples, seed)
    }

    /// Detect problematic words in `text` and annotate them
    pub fn annotate(&self, text: &str) -> EngineResult<Annotation> {
        let features = self.extractor.extract(text)?;
        Ok(annotate(text, &features.problematic))
    }

    /// Annotate with elements from an earlier analysis
    pub fn annotate_with(&self, text: &str, problematic: &ProblematicElements) -> Annotation {
        annotate(text, problematic)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default(), &ReferenceModel::builtin(), Lexicon::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Classification;

    const ARTICLE: &str = "The city council met on Tuesday to review the annual budget. \
        Officials said the new plan would increase funding for public schools and roads. \
        Several members asked for more time to study the proposal before the final vote.";

    #[test]
    fn test_analyze_text_fills_result() {
        let analyzer = Analyzer::default();
        let result = analyzer.analyze(&AnalysisInput::text(ARTICLE)).unwrap();
        assert_eq!(result.text_metrics.sentence_count, 3);
        assert_eq!(result.original_text, ARTICLE);
        assert!(result.word_frequencies.len() <= 15);
        assert_eq!(result.reference_frequencies.len(), result.word_frequencies.len());
        assert!(result.details.contains("lexical diversity"));
        assert!(result.bootstrap.is_none());
        assert!(result.source.is_none());
        assert_eq!(result.classification == Classification::Reliable, result.logit_score >= 0.0);
    }

    #[test]
    fn test_blank_input_is_empty_error() {
        let analyzer = Analyzer::default();
        for text in ["", "   \n\t"] {
            assert_eq!(analyzer.analyze_text(text).unwrap_err(), EngineError::EmptyInput);
            assert_eq!(analyzer.bootstrap(text, Some(1)).unwrap_err(), EngineError::EmptyInput);
        }
    }

    #[test]
    fn test_details_thresholds() {
        assert!(details(3.0, 0.1).contains("low lexical diversity"));
        assert!(details(5.0, 0.1).contains("normal lexical diversity"));
        assert!(details(5.0, 0.9).contains("differs significantly"));
        assert!(details(5.0, 0.5).contains("consistent with typical"));
    }

    #[test]
    fn test_url_input_uses_fetcher() {
        let analyzer = Analyzer::default().with_fetcher(|url: &str| -> EngineResult<String> {
            assert_eq!(url, "https://news.example.com/story");
            Ok(ARTICLE.to_string())
        });
        let result = analyzer
            .analyze(&AnalysisInput::url("https://news.example.com/story"))
            .unwrap();
        let source = result.source.unwrap();
        assert_eq!(source.host, "news.example.com");
        assert_eq!(result.original_text, ARTICLE);
    }

    #[test]
    fn test_url_errors_propagate() {
        let unreachable = Analyzer::default().with_fetcher(|url: &str| -> EngineResult<String> {
            Err(EngineError::UnreachableSource {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
        });
        let err = unreachable.analyze(&AnalysisInput::url("https://x.test")).unwrap_err();
        assert_eq!(err.kind(), "UnreachableSourceError");

        let blank = Analyzer::default().with_fetcher(|_: &str| -> EngineResult<String> { Ok("  ".into()) });
        let err = blank.analyze(&AnalysisInput::url("https://x.test")).unwrap_err();
        assert_eq!(err.kind(), "MalformedResponseError");
    }

    #[test]
    fn test_internal_bootstrap_attaches_summary() {
        let mut config = AnalysisConfig::default();
        config.bootstrap.samples = 20;
        config.bootstrap.seed = Some(11);
        let analyzer = Analyzer::new(config, &ReferenceModel::builtin(), Lexicon::builtin());
        let a = analyzer.analyze_text(ARTICLE).unwrap();
        let b = analyzer.analyze_text(ARTICLE).unwrap();
        let summary = a.bootstrap.unwrap();
        assert_eq!(summary.samples, 20);
        assert_eq!(Some(summary), b.bootstrap);
    }

    #[test]
    fn test_invalid_smoothing_is_reported() {
        let mut config = AnalysisConfig::default();
        config.divergence.smoothing = f64::NAN;

        let analyzer = Analyzer::new(config.clone(), &ReferenceModel::builtin(), Lexicon::builtin());
        let err = analyzer
            .analyze_text("Zorblax quintessential flibbertigibbet. The cat sat.")
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidFeatureInput");

        let err = Analyzer::from_config(config).err().unwrap();
        assert!(err.to_string().contains("divergence.smoothing"));
    }

    #[test]
    fn test_input_deserializes_untagged() {
        let text: AnalysisInput = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(text, AnalysisInput::text("hello"));
        let url: AnalysisInput = serde_json::from_str(r#"{"url": "https://a.b"}"#).unwrap();
        assert_eq!(url, AnalysisInput::url("https://a.b"));
        assert!(serde_json::from_str::<AnalysisInput>(r#"{"other": 1}"#).is_err());
    }

    #[test]
    fn test_annotate_finds_loaded_terms() {
        let analyzer = Analyzer::default();
        let annotation = analyzer
            .annotate("This shocking report exposes a secret deal.")
            .unwrap();
        let words: Vec<&str> = annotation.spans.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["shocking", "secret"]);
    }
}
