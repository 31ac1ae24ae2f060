//! Reliability classification
//!
//! Feature extraction, the fixed logistic model, and bootstrap estimation of
//! how stable those numbers are for a given text.
//!
//! Pipeline: text → [`FeatureExtractor`] → [`FeatureVector`] → [`classify`]
//! → [`ClassificationResult`](crate::models::ClassificationResult).

pub mod bootstrap;
mod features;
mod histogram;
pub mod model;

pub use bootstrap::{
    resample_text, summarize, BootstrapEngine, BootstrapSession, BootstrapSummary, Metric,
    MetricSummary,
};
pub use features::{kl_divergence, shannon_entropy, FeatureExtractor, FeatureVector, TextFeatures};
pub use histogram::{histogram, HistogramBucket};
pub use model::{classify, classify_logit, COEFFICIENTS};
