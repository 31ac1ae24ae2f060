//! Stop words and the loaded-language lexicon
//!
//! Both lists ship embedded in the binary. The loaded-language lexicon can be
//! replaced from a file: one term per line, `#` starts a comment, and for CSV
//! exports only the first column is used.

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use super::term_words;

const BUILTIN_STOP_WORDS: &str = include_str!("../../data/stop_words.txt");
const BUILTIN_LOADED_TERMS: &str = include_str!("../../data/loaded_terms.txt");

/// Whether common function words take part in the word distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopWordPolicy {
    /// Every word is counted (entropy and KL see the full text)
    #[default]
    Include,
    /// Stop words are dropped before counting
    Exclude,
}

/// A loaded-language entry, possibly spanning several words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconTerm {
    /// Canonical lowercase form, as reported in results
    pub term: String,
    /// The term split with the text tokenizer
    pub words: Vec<String>,
}

/// Word lists used by the feature extractor
#[derive(Debug, Clone)]
pub struct Lexicon {
    stop_words: FxHashSet<String>,
    loaded_terms: Vec<LexiconTerm>,
}

impl Lexicon {
    /// Embedded stop words and loaded-language terms
    pub fn builtin() -> Self {
        Self {
            stop_words: parse_list(BUILTIN_STOP_WORDS).into_iter().collect(),
            loaded_terms: parse_terms(BUILTIN_LOADED_TERMS),
        }
    }

    /// Build a lexicon from explicit lists
    pub fn new<S, T>(stop_words: S, loaded_terms: T) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let terms: Vec<String> = loaded_terms
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect();
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            loaded_terms: parse_terms(&terms.join("\n")),
        }
    }

    /// Replace the loaded-language terms with those from a file
    pub fn with_loaded_terms_file(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon {}", path.display()))?;
        let terms = parse_terms(&content);
        if terms.is_empty() {
            anyhow::bail!("Lexicon {} contains no terms", path.display());
        }
        debug!("Loaded {} lexicon terms from {}", terms.len(), path.display());
        self.loaded_terms = terms;
        Ok(self)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn loaded_terms(&self) -> &[LexiconTerm] {
        &self.loaded_terms
    }

    /// Lexicon entries present in a lowercase word sequence
    pub fn find_loaded_terms(&self, words: &[String]) -> BTreeSet<String> {
        let vocabulary: FxHashSet<&str> = words.iter().map(String::as_str).collect();

        self.loaded_terms
            .iter()
            .filter(|entry| match entry.words.as_slice() {
                [] => false,
                [single] => vocabulary.contains(single.as_str()),
                phrase => words.windows(phrase.len()).any(|w| w == phrase),
            })
            .map(|entry| entry.term.clone())
            .collect()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Non-empty, non-comment lines, first CSV column, lowercased
fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .map(|line| line.split(',').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .filter(|line| line != "word" && line != "term")
        .collect()
}

fn parse_terms(content: &str) -> Vec<LexiconTerm> {
    let mut seen = FxHashSet::default();
    parse_list(content)
        .into_iter()
        .filter_map(|term| {
            let words = term_words(&term);
            if words.is_empty() || !seen.insert(words.clone()) {
                return None;
            }
            Some(LexiconTerm { term, words })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        term_words(text)
    }

    #[test]
    fn test_builtin_lists_are_populated() {
        let lex = Lexicon::builtin();
        assert!(lex.is_stop_word("the"));
        assert!(!lex.is_stop_word("shocking"));
        assert!(lex.loaded_terms().iter().any(|t| t.term == "shocking"));
        assert!(lex.loaded_terms().iter().any(|t| t.words == vec!["fake", "news"]));
    }

    #[test]
    fn test_single_word_match_is_exact() {
        let lex = Lexicon::new(["the"], ["secret"]);
        let found = lex.find_loaded_terms(&words("The secretary kept a SECRET"));
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["secret"]);

        let found = lex.find_loaded_terms(&words("The secretary spoke"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_phrase_match_needs_consecutive_words() {
        let lex = Lexicon::new(Vec::<&str>::new(), ["fake news", "cover-up"]);
        let found = lex.find_loaded_terms(&words("This is fake news about a cover up"));
        assert_eq!(found.len(), 2);
        assert!(found.contains("fake news"));
        assert!(found.contains("cover-up"));

        let found = lex.find_loaded_terms(&words("fake stories and news"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_parse_csv_and_comments() {
        let terms = parse_terms("word,category\nShocking,emotion\n# comment\n\nhoax # inline\nshocking\n");
        let names: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["shocking", "hoax"]);
    }

    #[test]
    fn test_lexicon_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.txt");
        std::fs::write(&path, "bombshell\nmiracle cure\n").unwrap();
        let lex = Lexicon::builtin().with_loaded_terms_file(&path).unwrap();
        assert_eq!(lex.loaded_terms().len(), 2);
        assert!(lex.is_stop_word("and"));

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "# nothing\n").unwrap();
        assert!(Lexicon::builtin().with_loaded_terms_file(&empty).is_err());
    }
}
