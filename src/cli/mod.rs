//! CLI command definitions and handlers

mod analyze;
mod annotate;
mod bootstrap;
mod init;
mod input;
mod serve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use veracity::config::{load_config, AnalysisConfig};
use veracity::text::StopWordPolicy;
use veracity::Analyzer;

use input::InputArgs;

/// Parse and validate a positive count
fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// veracity - statistical text reliability analysis
#[derive(Parser, Debug)]
#[command(name = "veracity")]
#[command(
    version,
    about = "Estimate how likely a text is to be misleading from its word statistics",
    long_about = "veracity compares a text's word distribution with a reference language model \
(Shannon entropy, KL divergence), flags overused words and loaded language, and combines \
these features with a fixed logistic model. Bootstrap resampling shows how stable the \
numbers are.\n\n\
Text is read from an argument, a file (--file), a plain-text URL (--url) or stdin.",
    after_help = "\
Examples:
  veracity analyze article.txt                     Analyze a file
  cat article.txt | veracity analyze --format json JSON output for scripting
  veracity analyze --url https://example.com/a.txt Analyze a plain-text URL
  veracity bootstrap -f article.txt --samples 400  Bootstrap statistics
  veracity annotate -f article.txt                 Highlight problematic words
  veracity serve                                   JSON-RPC server on stdio"
)]
pub struct Cli {
    /// Config file (default: ./veracity.toml, then the user config dir)
    #[arg(long, global = true, env = "VERACITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reference model table (word<TAB>count per line)
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// Loaded-language lexicon (one term per line)
    #[arg(long, global = true)]
    pub lexicon: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a text and classify its reliability
    #[command(after_help = "\
Examples:
  veracity analyze \"Some text to check.\"
  veracity analyze --file article.txt --format json
  veracity analyze --file article.txt --samples 400 --seed 7
  veracity analyze --file article.txt --fail-on-misleading")]
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Output format: text, json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Internal bootstrap samples (overrides bootstrap.samples)
        #[arg(long)]
        samples: Option<usize>,

        /// Seed for the internal bootstrap
        #[arg(long)]
        seed: Option<u64>,

        /// Words shown in the frequency table
        #[arg(long, value_parser = parse_positive)]
        top: Option<usize>,

        /// Stop-word policy for entropy and KL divergence
        #[arg(long, value_parser = ["include", "exclude"])]
        stop_words: Option<String>,

        /// Also print the annotated text
        #[arg(long)]
        highlight: bool,

        /// Exit with code 1 when the text is classified as misleading
        #[arg(long)]
        fail_on_misleading: bool,
    },

    /// Resample the text and report mean, standard error and histograms
    Bootstrap {
        #[command(flatten)]
        input: InputArgs,

        /// Number of samples
        #[arg(long, short = 'n', default_value = "100", value_parser = parse_positive)]
        samples: usize,

        /// Seed for reproducible samples
        #[arg(long)]
        seed: Option<u64>,

        /// Metrics to chart: entropy, kl, avgSentenceLength, overused, probability
        #[arg(long, short = 'm', default_values_t = vec!["entropy".to_string(), "kl".to_string()])]
        metric: Vec<String>,

        /// Histogram buckets (overrides bootstrap.buckets)
        #[arg(long, value_parser = parse_positive)]
        buckets: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Highlight overused words and loaded language in the text
    Annotate {
        #[command(flatten)]
        input: InputArgs,

        /// Output format: text, json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Start the JSON-RPC server on stdin/stdout
    Serve,

    /// Write an example veracity.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Paths given on the command line are relative to the working directory
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Load the config and apply the global data-file flags
fn load_analysis_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = &cli.reference {
        config.reference.path = Some(absolute(path)?);
    }
    if let Some(path) = &cli.lexicon {
        config.lexicon.path = Some(absolute(path)?);
    }
    Ok(config)
}

fn build_analyzer(config: AnalysisConfig) -> Result<Analyzer> {
    Analyzer::from_config(config).context("Failed to load analysis settings")
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let mut config = load_analysis_config(&cli)?;

    match cli.command {
        Commands::Init { path, force } => init::run(&path, force),

        Commands::Serve => serve::run(build_analyzer(config)?),

        Commands::Analyze {
            input,
            format,
            output,
            samples,
            seed,
            top,
            stop_words,
            highlight,
            fail_on_misleading,
        } => {
            if let Some(n) = samples {
                config.bootstrap.samples = n;
            }
            if seed.is_some() {
                config.bootstrap.seed = seed;
            }
            if let Some(n) = top {
                config.display.top_words = n;
            }
            if let Some(policy) = stop_words.as_deref() {
                config.vocabulary.stop_words = match policy {
                    "exclude" => StopWordPolicy::Exclude,
                    _ => StopWordPolicy::Include,
                };
            }
            let analyzer = build_analyzer(config)?;
            analyze::run(
                &analyzer,
                &input,
                analyze::AnalyzeOptions {
                    format: format.parse()?,
                    output: output.as_deref(),
                    highlight,
                    fail_on_misleading,
                },
            )
        }

        Commands::Bootstrap {
            input,
            samples,
            seed,
            metric,
            buckets,
            format,
            quiet,
        } => {
            let buckets = buckets.unwrap_or(config.bootstrap.buckets);
            let seed = seed.or(config.bootstrap.seed);
            let analyzer = build_analyzer(config)?;
            bootstrap::run(
                &analyzer,
                &input,
                bootstrap::BootstrapOptions {
                    samples,
                    seed,
                    metrics: metric,
                    buckets,
                    format: format.parse()?,
                    quiet,
                },
            )
        }

        Commands::Annotate { input, format } => {
            let analyzer = build_analyzer(config)?;
            annotate::run(&analyzer, &input, format.parse()?)
        }
    }
}
