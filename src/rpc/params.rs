//! Request parameter types

use serde::{Deserialize, Serialize};

use crate::models::ProblematicElements;

#[derive(Debug, Serialize, Deserialize)]
pub struct BootstrapParams {
    pub text: String,
    /// Fixed seed for a reproducible sample
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BootstrapBatchParams {
    pub text: String,
    /// Number of samples to draw
    pub samples: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistogramParams {
    /// entropy, kl, avgSentenceLength, overused or probability
    pub metric: String,
    /// Defaults to `bootstrap.buckets` from the config
    pub buckets: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateParams {
    pub text: String,
    /// Elements from an earlier `analyze`; detected afresh when absent
    pub problematic_elements: Option<ProblematicElements>,
}
