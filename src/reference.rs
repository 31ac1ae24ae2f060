//! Reference language model
//!
//! A fixed word-frequency distribution for "typical reliable" prose, used as
//! the baseline for KL divergence and overuse detection. The model is loaded
//! once and shared read-only; how it was produced is outside this crate.
//!
//! File format: one `word<TAB>count` (or whitespace separated) pair per line,
//! `#` comments allowed. Duplicate words are summed.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::path::Path;
use tracing::debug;

use crate::models::WordFrequencyDistribution;
use crate::text::{Lexicon, StopWordPolicy};

const BUILTIN_REFERENCE: &str = include_str!("../data/reference_en.tsv");

/// Word counts of the reference corpus
#[derive(Debug, Clone)]
pub struct ReferenceModel {
    counts: FxHashMap<String, u64>,
    total: u64,
}

impl ReferenceModel {
    /// Embedded English reference distribution
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_REFERENCE).expect("embedded reference table is well-formed")
    }

    /// Build from (word, count) pairs. Words are lowercased; zero counts dropped.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut merged: FxHashMap<String, u64> = FxHashMap::default();
        for (word, count) in counts {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || count == 0 {
                continue;
            }
            *merged.entry(word).or_insert(0) += count;
        }
        let total = merged.values().sum();
        Self {
            counts: merged,
            total,
        }
    }

    /// Parse the tab/whitespace separated table format
    pub fn parse(content: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(word), Some(count), None) = (fields.next(), fields.next(), fields.next()) else {
                anyhow::bail!("line {}: expected `word<TAB>count`", idx + 1);
            };
            let count: u64 = count
                .parse()
                .with_context(|| format!("line {}: invalid count '{}'", idx + 1, count))?;
            rows.push((word, count));
        }

        let model = Self::from_counts(rows);
        if model.total == 0 {
            anyhow::bail!("reference table contains no entries");
        }
        Ok(model)
    }

    /// Load a reference table from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference model {}", path.display()))?;
        let model = Self::parse(&content)
            .with_context(|| format!("Invalid reference model {}", path.display()))?;
        debug!(
            "Loaded reference model from {} ({} words, {} tokens)",
            path.display(),
            model.vocabulary_size(),
            model.total
        );
        Ok(model)
    }

    /// Apply the stop-word policy. Excluded words are removed and the rest renormalized.
    pub fn filtered(&self, policy: StopWordPolicy, lexicon: &Lexicon) -> Self {
        match policy {
            StopWordPolicy::Include => self.clone(),
            StopWordPolicy::Exclude => Self::from_counts(
                self.counts
                    .iter()
                    .filter(|(w, _)| !lexicon.is_stop_word(w))
                    .map(|(w, c)| (w.as_str(), *c)),
            ),
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Unsmoothed probability; 0 for unknown words
    pub fn probability(&self, word: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(word).map_or(0.0, |&c| c as f64 / self.total as f64)
    }

    /// Additively smoothed view over the reference vocabulary plus `article_vocab`
    pub fn smoothed<'a, I>(&'a self, alpha: f64, article_vocab: I) -> SmoothedReference<'a>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unseen = article_vocab
            .into_iter()
            .filter(|w| !self.counts.contains_key(*w))
            .count();
        let support = self.counts.len() + unseen;
        SmoothedReference {
            model: self,
            alpha,
            norm: 1.0 + alpha * support as f64,
        }
    }

    /// Reference percentages for a set of words, normalized over that subset.
    ///
    /// Used to chart the article's top words next to their reference share.
    pub fn comparison_distribution<'w, I>(&self, words: I) -> WordFrequencyDistribution
    where
        I: IntoIterator<Item = &'w str>,
    {
        let rows: Vec<(String, u64)> = words
            .into_iter()
            .map(|w| (w.to_string(), self.counts.get(w).copied().unwrap_or(0)))
            .collect();
        let subset_total: u64 = rows.iter().map(|(_, c)| c).sum();

        WordFrequencyDistribution::from_percentages(
            rows.into_iter()
                .map(|(w, c)| {
                    let pct = if subset_total > 0 {
                        c as f64 / subset_total as f64 * 100.0
                    } else {
                        0.0
                    };
                    (w, pct)
                })
                .collect(),
        )
    }
}

impl Default for ReferenceModel {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Q'(w) = (Q(w) + α) / (1 + α·N), N = |reference vocabulary ∪ article vocabulary|.
///
/// Sums to 1 over that union, so KL divergence against it is never negative.
#[derive(Debug, Clone, Copy)]
pub struct SmoothedReference<'a> {
    model: &'a ReferenceModel,
    alpha: f64,
    norm: f64,
}

impl SmoothedReference<'_> {
    pub fn probability(&self, word: &str) -> f64 {
        (self.model.probability(word) + self.alpha) / self.norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loads() {
        let model = ReferenceModel::builtin();
        assert!(model.vocabulary_size() > 300);
        assert!(model.probability("the") > model.probability("government"));
        assert_eq!(model.probability("zyzzyva"), 0.0);
    }

    #[test]
    fn test_parse_sums_duplicates_and_skips_comments() {
        let model = ReferenceModel::parse("# header\nThe\t3\nthe 2\n\nfox\t5 # trailing\n").unwrap();
        assert_eq!(model.total(), 10);
        assert_eq!(model.probability("the"), 0.5);
    }

    #[test]
    fn test_parse_errors() {
        assert!(ReferenceModel::parse("word\tmany\n").is_err());
        assert!(ReferenceModel::parse("just-a-word\n").is_err());
        assert!(ReferenceModel::parse("# nothing here\n").is_err());
    }

    #[test]
    fn test_smoothed_sums_to_one_over_support() {
        let model = ReferenceModel::from_counts([("a", 6u64), ("b", 4)]);
        let article = ["a", "c", "d"];
        let q = model.smoothed(0.01, article.iter().copied());
        let sum: f64 = ["a", "b", "c", "d"].iter().map(|w| q.probability(w)).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(q.probability("c") > 0.0);
    }

    #[test]
    fn test_filtered_excludes_stop_words() {
        let lexicon = Lexicon::new(["the"], Vec::<&str>::new());
        let model = ReferenceModel::from_counts([("the", 8u64), ("fox", 2)]);
        let filtered = model.filtered(StopWordPolicy::Exclude, &lexicon);
        assert!(!filtered.contains("the"));
        assert_eq!(filtered.probability("fox"), 1.0);
        let kept = model.filtered(StopWordPolicy::Include, &lexicon);
        assert_eq!(kept.total(), 10);
    }

    #[test]
    fn test_comparison_distribution_normalizes_subset() {
        let model = ReferenceModel::from_counts([("the", 30u64), ("fox", 10), ("dog", 60)]);
        let dist = model.comparison_distribution(["the", "fox", "unknown"]);
        let pcts: Vec<f64> = dist.entries().iter().map(|e| e.percentage).collect();
        assert_eq!(pcts, vec![75.0, 25.0, 0.0]);
    }
}
