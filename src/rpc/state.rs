//! Per-connection session state
//!
//! The text under study and the bootstrap samples drawn from it. Owned by the
//! server and passed explicitly to handlers.

use tracing::debug;

use crate::classifier::BootstrapSession;

#[derive(Debug, Default)]
pub struct SessionState {
    text: Option<String>,
    pub samples: BootstrapSession,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Make `text` the text under study. Samples of a different text are dropped.
    /// Returns true when the samples were reset.
    pub fn select_text(&mut self, text: &str) -> bool {
        if self.text.as_deref() == Some(text) {
            return false;
        }
        let had_samples = !self.samples.is_empty();
        if had_samples {
            debug!("Text changed, dropping {} bootstrap samples", self.samples.len());
        }
        self.samples.clear();
        self.text = Some(text.to_string());
        had_samples
    }

    pub fn reset(&mut self) {
        self.text = None;
        self.samples.clear();
    }
}
