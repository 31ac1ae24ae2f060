//! Analyze command

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tracing::info;

use veracity::reporters::{self, AnnotationReport, OutputFormat};
use veracity::Analyzer;

use super::input::InputArgs;

pub struct AnalyzeOptions<'a> {
    pub format: OutputFormat,
    pub output: Option<&'a Path>,
    pub highlight: bool,
    pub fail_on_misleading: bool,
}

pub fn run(analyzer: &Analyzer, input: &InputArgs, opts: AnalyzeOptions<'_>) -> Result<()> {
    let input = input.to_input()?;
    let result = analyzer.analyze(&input)?;

    let mut rendered = reporters::render_analysis(&result, opts.format)?;
    if opts.highlight && opts.format == OutputFormat::Text {
        let report = AnnotationReport {
            annotation: analyzer.annotate_with(&result.original_text, &result.problematic_elements),
            problematic_elements: result.problematic_elements.clone(),
        };
        rendered.push('\n');
        rendered.push_str(&reporters::render_annotation(&report, OutputFormat::Text)?);
    }

    match opts.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote report to {}", path.display());
            eprintln!("{} Report written to {}", style("✓").green(), style(path.display()).cyan());
        }
        None => println!("{}", rendered),
    }

    if opts.fail_on_misleading && !result.classification_result().is_reliable() {
        eprintln!(
            "{} Text classified as {}",
            style("✗").red(),
            style(result.classification).red().bold()
        );
        std::process::exit(1);
    }

    Ok(())
}
