//! Text (terminal) reporter with colors and formatting

use super::{AnnotationReport, BootstrapReport};
use crate::annotate::Segment;
use crate::classifier::{Metric, MetricSummary};
use crate::models::{AnalysisResult, AnnotationKind, Classification, ConfidenceLevel};

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const MAGENTA: &str = "\x1b[35m";

const BAR_WIDTH: usize = 30;

fn verdict_color(classification: Classification) -> &'static str {
    match classification {
        Classification::Reliable => GREEN,
        Classification::Misleading => RED,
    }
}

fn confidence_label(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "high",
        ConfidenceLevel::Medium => "medium",
        ConfidenceLevel::Low => "low",
    }
}

fn kind_color(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::Overused => YELLOW,
        AnnotationKind::Suspicious => MAGENTA,
    }
}

fn rule(out: &mut String) {
    out.push_str(&format!("{DIM}──────────────────────────────────────{RESET}\n"));
}

fn join_or_none(words: &std::collections::BTreeSet<String>) -> String {
    if words.is_empty() {
        format!("{DIM}none{RESET}")
    } else {
        words.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn format_summary(label: &str, s: &MetricSummary) -> String {
    format!(
        "  {:<24} {:>8.3} ± {:<7.3} {DIM}95% [{:.3}, {:.3}]{RESET}\n",
        label, s.mean, s.std_err, s.ci_low, s.ci_high
    )
}

/// Render an analysis result for the terminal
pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let verdict = result.classification_result();
    let color = verdict_color(result.classification);

    out.push_str(&format!("\n{BOLD}veracity analysis{RESET}\n"));
    rule(&mut out);
    if let Some(source) = &result.source {
        out.push_str(&format!("Source: {}  {DIM}{}{RESET}\n", source.host, source.url));
    }
    out.push_str(&format!(
        "Verdict: {color}{BOLD}{}{RESET}  Probability: {BOLD}{:.1}%{RESET}  Confidence: {:.0}% ({})\n",
        result.classification,
        result.reliability_probability * 100.0,
        result.confidence * 100.0,
        confidence_label(verdict.confidence_level())
    ));
    out.push_str(&format!("{DIM}Logit score: {:.3}{RESET}\n\n", result.logit_score));

    let m = &result.text_metrics;
    out.push_str(&format!("{BOLD}METRICS{RESET}\n"));
    out.push_str(&format!(
        "  Words: {}  Unique: {}  Sentences: {}  Avg sentence length: {:.1}\n",
        m.word_count, m.unique_word_count, m.sentence_count, m.avg_sentence_length
    ));
    out.push_str(&format!("  Lexical diversity: {:.2}\n", m.lexical_diversity()));
    out.push_str(&format!(
        "  Entropy: {:.3} bits  KL divergence: {:.3} nats\n\n",
        result.entropy_score, result.kl_divergence
    ));

    let p = &result.problematic_elements;
    out.push_str(&format!("{BOLD}PROBLEMATIC ELEMENTS{RESET}\n"));
    out.push_str(&format!("  Overused words: {}\n", join_or_none(&p.overused_words)));
    out.push_str(&format!("  Loaded terms:   {}\n\n", join_or_none(&p.suspicious_words)));

    if !result.word_frequencies.is_empty() {
        out.push_str(&format!("{BOLD}TOP WORDS{RESET}\n"));
        out.push_str(&format!("{DIM}  WORD              TEXT %   REFERENCE %{RESET}\n"));
        for entry in result.word_frequencies.entries() {
            let reference = result
                .reference_frequencies
                .entries()
                .iter()
                .find(|r| r.word == entry.word)
                .map_or(0.0, |r| r.percentage);
            out.push_str(&format!(
                "  {:<16} {:>7.2}   {:>11.2}\n",
                entry.word, entry.percentage, reference
            ));
        }
        out.push('\n');
    }

    if let Some(summary) = &result.bootstrap {
        out.push_str(&format!("{BOLD}BOOTSTRAP{RESET} ({} samples)\n", summary.samples));
        for metric in Metric::ALL {
            out.push_str(&format_summary(metric.label(), summary.metric(metric)));
        }
        out.push('\n');
    }

    out.push_str(&format!("{DIM}{}{RESET}\n", result.details));
    out
}

/// Render bootstrap statistics and histograms
pub fn render_bootstrap(report: &BootstrapReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str(&format!("\n{BOLD}veracity bootstrap{RESET}\n"));
    rule(&mut out);
    out.push_str(&format!("Samples: {}", summary.samples));
    if let Some(seed) = report.seed {
        out.push_str(&format!("  {DIM}seed {}{RESET}", seed));
    }
    out.push_str(&format!(
        "  Classified reliable: {:.1}%\n\n",
        summary.reliable_share * 100.0
    ));

    out.push_str(&format!("{DIM}  METRIC                       MEAN   STD ERR{RESET}\n"));
    for metric in Metric::ALL {
        out.push_str(&format_summary(metric.label(), summary.metric(metric)));
    }

    for hist in &report.histograms {
        out.push_str(&format!("\n{BOLD}{}{RESET}\n", hist.metric.label()));
        let max = hist.buckets.iter().map(|b| b.count).max().unwrap_or(0);
        for bucket in &hist.buckets {
            let width = if max == 0 { 0 } else { bucket.count * BAR_WIDTH / max };
            out.push_str(&format!(
                "  {:<17} {GREEN}{}{RESET} {}\n",
                bucket.label,
                "█".repeat(width),
                bucket.count
            ));
        }
    }

    out
}

/// Render the annotated text followed by one explanation per highlight
pub fn render_annotation(report: &AnnotationReport) -> String {
    let mut out = String::new();
    let annotation = &report.annotation;

    for segment in &annotation.segments {
        match segment {
            Segment::Plain { text } => out.push_str(text),
            Segment::Highlighted { text, kind, .. } => {
                let c = kind_color(*kind);
                out.push_str(&format!("{c}{BOLD}{text}{RESET}"));
            }
        }
    }
    out.push_str("\n\n");

    if annotation.spans.is_empty() {
        out.push_str(&format!("{DIM}No problematic elements found.{RESET}\n"));
        return out;
    }

    for (i, span) in annotation.spans.iter().enumerate() {
        let c = kind_color(span.kind);
        out.push_str(&format!(
            "  {DIM}{:>2}{RESET}  {c}{}{RESET}  {}\n",
            i + 1,
            span.matched,
            span.explanation
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::classifier::{BootstrapSession, Metric};
    use crate::reporters::tests::{test_result, ARTICLE};
    use crate::reporters::MetricHistogram;

    #[test]
    fn test_analysis_render_has_sections() {
        let result = test_result();
        let text = render_analysis(&result);
        assert!(text.contains(&result.classification.to_string()));
        assert!(text.contains("METRICS"));
        let diversity = format!("Lexical diversity: {:.2}", result.text_metrics.lexical_diversity());
        assert!(text.contains(&diversity));
        assert!(text.contains("shocking"));
        assert!(text.contains(&result.details));
        assert!(!text.contains("BOOTSTRAP"));
    }

    #[test]
    fn test_bootstrap_render() {
        let analyzer = Analyzer::default();
        let mut session = BootstrapSession::new();
        session.extend(analyzer.bootstrap_batch(ARTICLE, 10, Some(3)).unwrap());
        let report = BootstrapReport {
            seed: Some(3),
            summary: session.summary().unwrap(),
            histograms: vec![MetricHistogram {
                metric: Metric::Entropy,
                buckets: session.histogram(Metric::Entropy, 4),
            }],
        };
        let text = render_bootstrap(&report);
        assert!(text.contains("Samples: 10"));
        assert!(text.contains("seed 3"));
        assert!(text.contains("Entropy"));
        assert!(text.contains('█'));
    }

    #[test]
    fn test_annotation_render_lists_explanations() {
        let analyzer = Analyzer::default();
        let result = test_result();
        let report = AnnotationReport {
            annotation: analyzer.annotate_with(ARTICLE, &result.problematic_elements),
            problematic_elements: result.problematic_elements,
        };
        let text = render_annotation(&report);
        assert!(text.contains("is a loaded term"));
        assert!(text.contains("Shocking"));
    }
}
