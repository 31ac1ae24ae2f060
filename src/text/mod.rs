//! Tokenization of raw text into words and sentences
//!
//! Words are maximal runs of Unicode letters and digits. A sentence ends at a
//! run of `.`, `!` or `?` followed by whitespace or the end of the text; a
//! trailing fragment without terminal punctuation still counts as a sentence
//! if it contains at least one word.
//!
//! All offsets are UTF-8 byte offsets into the source string.

mod lexicon;

pub use lexicon::{Lexicon, LexiconTerm, StopWordPolicy};

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

use crate::models::TextMetrics;

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();
static TERMINATOR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn word_pattern() -> &'static Regex {
    WORD_PATTERN.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid word regex"))
}

fn terminator_pattern() -> &'static Regex {
    TERMINATOR_PATTERN.get_or_init(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid terminator regex"))
}

/// A word occurrence in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    /// Last word of a sentence closed by terminal punctuation
    pub sentence_final: bool,
}

/// A sentence span (terminal punctuation included when present)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub word_count: usize,
}

/// Result of tokenizing one text
#[derive(Debug, Clone)]
pub struct TokenizedText<'a> {
    pub source: &'a str,
    pub words: Vec<Token<'a>>,
    pub sentences: Vec<Sentence<'a>>,
}

impl<'a> TokenizedText<'a> {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words folded to lowercase, in text order
    pub fn lowercase_words(&self) -> Vec<String> {
        self.words.iter().map(|t| t.text.to_lowercase()).collect()
    }

    pub fn metrics(&self) -> TextMetrics {
        let unique: FxHashSet<String> = self.words.iter().map(|t| t.text.to_lowercase()).collect();
        TextMetrics::from_counts(self.word_count(), unique.len(), self.sentence_count())
    }
}

/// Split raw text into word tokens and sentences
pub fn tokenize(text: &str) -> TokenizedText<'_> {
    let mut words: Vec<Token<'_>> = word_pattern()
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
            sentence_final: false,
        })
        .collect();

    let mut sentences = Vec::new();
    let mut seg_start = 0;
    let mut next_word = 0;

    let mut close_segment = |seg_end: usize, terminated: bool, next_word: &mut usize| {
        let first = *next_word;
        while *next_word < words.len() && words[*next_word].start < seg_end {
            *next_word += 1;
        }
        let count = *next_word - first;
        if count == 0 {
            return None;
        }
        if terminated {
            words[*next_word - 1].sentence_final = true;
        }
        Some(count)
    };

    for m in terminator_pattern().find_iter(text) {
        // Sentence text keeps its punctuation but not the trailing whitespace
        let punct_end = m.start() + m.as_str().trim_end().len();
        if let Some(word_count) = close_segment(m.start(), true, &mut next_word) {
            let raw = &text[seg_start..punct_end];
            let lead = raw.len() - raw.trim_start().len();
            sentences.push(Sentence {
                text: raw.trim_start(),
                start: seg_start + lead,
                end: punct_end,
                word_count,
            });
        }
        seg_start = m.end();
    }

    if seg_start < text.len() {
        if let Some(word_count) = close_segment(text.len(), false, &mut next_word) {
            let raw = &text[seg_start..];
            let lead = raw.len() - raw.trim_start().len();
            let trimmed = raw.trim();
            sentences.push(Sentence {
                text: trimmed,
                start: seg_start + lead,
                end: seg_start + lead + trimmed.len(),
                word_count,
            });
        }
    }

    TokenizedText {
        source: text,
        words,
        sentences,
    }
}

/// Tokenize a lexicon term or query into lowercase words
pub fn term_words(term: &str) -> Vec<String> {
    word_pattern()
        .find_iter(term)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// True for empty or whitespace-only input
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
