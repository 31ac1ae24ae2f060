//! Where the text comes from: argument, file, URL or stdin

use anyhow::{Context, Result};
use clap::Args;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing::debug;

use veracity::{AnalysisInput, Analyzer};

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Text to analyze (reads stdin when no input is given)
    #[arg(conflicts_with_all = ["file", "url"])]
    pub text: Option<String>,

    /// Read the text from a file ("-" for stdin)
    #[arg(long, short = 'f', conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Fetch the text from a plain-text URL
    #[arg(long)]
    pub url: Option<String>,
}

impl InputArgs {
    /// Analysis input; URLs are left for the analyzer to resolve
    pub fn to_input(&self) -> Result<AnalysisInput> {
        match &self.url {
            Some(url) => Ok(AnalysisInput::url(url.clone())),
            None => Ok(AnalysisInput::text(self.read_local()?)),
        }
    }

    /// The text itself, fetching URLs through the analyzer
    pub fn read_text(&self, analyzer: &Analyzer) -> Result<String> {
        match &self.url {
            Some(url) => Ok(analyzer.resolve_url(url)?),
            None => self.read_local(),
        }
    }

    fn read_local(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        match &self.file {
            Some(path) if path.as_os_str() != "-" => {
                debug!("Reading {}", path.display());
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))
            }
            _ => read_stdin(),
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No input: pass text, --file, --url, or pipe text on stdin");
    }
    let mut buf = String::new();
    stdin
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_text() {
        let args = InputArgs {
            text: Some("hello world".into()),
            ..Default::default()
        };
        assert_eq!(args.to_input().unwrap(), AnalysisInput::text("hello world"));
    }

    #[test]
    fn test_url_is_passed_through() {
        let args = InputArgs {
            url: Some("https://example.com/a.txt".into()),
            ..Default::default()
        };
        assert_eq!(
            args.to_input().unwrap(),
            AnalysisInput::url("https://example.com/a.txt")
        );
    }

    #[test]
    fn test_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "From a file.").unwrap();
        let args = InputArgs {
            file: Some(path),
            ..Default::default()
        };
        assert_eq!(args.to_input().unwrap(), AnalysisInput::text("From a file."));

        let missing = InputArgs {
            file: Some(dir.path().join("missing.txt")),
            ..Default::default()
        };
        assert!(missing.to_input().is_err());
    }
}
