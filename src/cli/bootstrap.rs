//! Bootstrap command

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::info;

use veracity::classifier::{BootstrapSession, Metric};
use veracity::reporters::{self, BootstrapReport, MetricHistogram, OutputFormat};
use veracity::Analyzer;

use super::input::InputArgs;

pub struct BootstrapOptions {
    pub samples: usize,
    pub seed: Option<u64>,
    pub metrics: Vec<String>,
    pub buckets: usize,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Create bar progress style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("valid progress template")
        .progress_chars("█▓▒░  ")
}

pub fn run(analyzer: &Analyzer, input: &InputArgs, opts: BootstrapOptions) -> Result<()> {
    let metrics = opts
        .metrics
        .iter()
        .map(|m| m.parse::<Metric>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;

    let text = input.read_text(analyzer)?;
    let seed = opts.seed.unwrap_or_else(rand::random);

    let bar = if opts.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(opts.samples as u64);
        bar.set_style(create_bar_style());
        bar.set_message("resampling");
        bar
    };

    let start = Instant::now();
    let batch = analyzer
        .bootstrap_engine()
        .run_batch_with_progress(&text, opts.samples, Some(seed), || bar.inc(1));
    bar.finish_and_clear();
    let batch = batch?;
    info!("Drew {} bootstrap samples in {:?}", batch.len(), start.elapsed());

    let mut session = BootstrapSession::new();
    session.extend(batch);
    let Some(summary) = session.summary() else {
        anyhow::bail!("No bootstrap samples were drawn");
    };

    let report = BootstrapReport {
        seed: Some(seed),
        summary,
        histograms: metrics
            .into_iter()
            .map(|metric| MetricHistogram {
                metric,
                buckets: session.histogram(metric, opts.buckets),
            })
            .collect(),
    };

    println!("{}", reporters::render_bootstrap(&report, opts.format)?);
    Ok(())
}
