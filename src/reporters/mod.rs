//! Output reporters for veracity results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON (camelCase fields, same shape the server returns)

mod json;
mod text;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::annotate::Annotation;
use crate::classifier::{BootstrapSummary, HistogramBucket, Metric};
use crate::models::{AnalysisResult, ProblematicElements};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Histogram of one bootstrap metric
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricHistogram {
    pub metric: Metric,
    pub buckets: Vec<HistogramBucket>,
}

/// Output of `veracity bootstrap`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub summary: BootstrapSummary,
    pub histograms: Vec<MetricHistogram>,
}

/// Output of `veracity annotate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationReport {
    pub problematic_elements: ProblematicElements,
    #[serde(flatten)]
    pub annotation: Annotation,
}

pub fn render_analysis(result: &AnalysisResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_analysis(result)),
        OutputFormat::Json => json::render(result),
    }
}

pub fn render_bootstrap(report: &BootstrapReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_bootstrap(report)),
        OutputFormat::Json => json::render(report),
    }
}

pub fn render_annotation(report: &AnnotationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_annotation(report)),
        OutputFormat::Json => json::render(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analyzer::Analyzer;

    pub(crate) const ARTICLE: &str = "Shocking claims spread online this week. \
        Officials said the report was false and the shocking numbers were invented. \
        Experts urged readers to check sources before sharing secret documents.";

    pub(crate) fn test_result() -> AnalysisResult {
        Analyzer::default().analyze_text(ARTICLE).expect("analysis succeeds")
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("sarif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_annotation_report_flattens_spans() {
        let analyzer = Analyzer::default();
        let result = test_result();
        let report = AnnotationReport {
            annotation: analyzer.annotate_with(ARTICLE, &result.problematic_elements),
            problematic_elements: result.problematic_elements,
        };
        let json = render_annotation(&report, OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(v["spans"].is_array());
        assert!(v["segments"].is_array());
        assert!(v["problematicElements"]["suspiciousWords"].is_array());
    }
}
