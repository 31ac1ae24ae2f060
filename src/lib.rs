//! veracity - statistical text reliability analysis
//!
//! Estimates how likely a text is to be misleading from its word statistics:
//! Shannon entropy, KL divergence against a reference language model, overused
//! words and loaded language, combined by a fixed logistic model. Bootstrap
//! resampling measures how stable those numbers are for the given text.
//!
//! ```no_run
//! use veracity::analyzer::{AnalysisInput, Analyzer};
//!
//! let analyzer = Analyzer::default();
//! let result = analyzer.analyze(&AnalysisInput::text("Some article text.")).unwrap();
//! println!("{} ({:.2})", result.classification, result.reliability_probability);
//! ```

pub mod analyzer;
pub mod annotate;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod reference;
pub mod reporters;
pub mod rpc;
pub mod source;
pub mod text;

pub use analyzer::{AnalysisInput, Analyzer};
pub use error::{EngineError, EngineResult};
