//! Engine error taxonomy
//!
//! Every failure inside the engine is converted into one of these kinds close
//! to where it happens, so callers never see raw arithmetic artifacts
//! (NaN, infinities) in a result.

use thiserror::Error;

/// Errors that can occur while analyzing text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Blank or whitespace-only input, or input without a single word
    #[error("No text provided: input is empty or contains no words")]
    EmptyInput,

    /// A URL could not be fetched or turned into text
    #[error("Could not reach source {url}: {reason}")]
    UnreachableSource { url: String, reason: String },

    /// A non-finite intermediate value reached the classifier
    #[error("Invalid feature input: {feature} = {value}")]
    InvalidFeatureInput { feature: &'static str, value: f64 },

    /// A collaborator answered, but with nothing usable
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl EngineError {
    /// Stable machine-readable kind, used by the JSON-RPC boundary
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::EmptyInput => "EmptyInputError",
            EngineError::UnreachableSource { .. } => "UnreachableSourceError",
            EngineError::InvalidFeatureInput { .. } => "InvalidFeatureInput",
            EngineError::MalformedResponse(_) => "MalformedResponseError",
        }
    }

    /// Whether the user can fix this by retrying or re-entering input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyInput | EngineError::UnreachableSource { .. }
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            EngineError::EmptyInput,
            EngineError::UnreachableSource {
                url: "http://example.invalid".into(),
                reason: "dns".into(),
            },
            EngineError::InvalidFeatureInput {
                feature: "entropy",
                value: f64::NAN,
            },
            EngineError::MalformedResponse("empty body".into()),
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_display_names_feature() {
        let err = EngineError::InvalidFeatureInput {
            feature: "kl_divergence",
            value: f64::INFINITY,
        };
        assert!(err.to_string().contains("kl_divergence"));
        assert!(!err.is_recoverable());
        assert!(EngineError::EmptyInput.is_recoverable());
    }
}
