//! Annotate command

use anyhow::Result;

use veracity::reporters::{self, AnnotationReport, OutputFormat};
use veracity::Analyzer;

use super::input::InputArgs;

pub fn run(analyzer: &Analyzer, input: &InputArgs, format: OutputFormat) -> Result<()> {
    let text = input.read_text(analyzer)?;
    let features = analyzer.extractor().extract(&text)?;
    let report = AnnotationReport {
        annotation: analyzer.annotate_with(&text, &features.problematic),
        problematic_elements: features.problematic,
    };
    println!("{}", reporters::render_annotation(&report, format)?);
    Ok(())
}
