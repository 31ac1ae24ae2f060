//! Mapping problematic words back onto the source text
//!
//! Each distinct flagged term is highlighted once, at its first whole-word
//! occurrence. Overused words are placed before loaded terms, so a word in both
//! sets carries the overused explanation. When a term's first occurrence lies
//! inside an earlier or longer span, its first free occurrence is used instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{AnnotationKind, AnnotationSpan, ProblematicElements};
use crate::text::{self, term_words};

pub fn explanation(kind: AnnotationKind, word: &str) -> String {
    match kind {
        AnnotationKind::Overused => format!(
            "\"{}\" is repeated excessively, which is a common tactic in misleading content.",
            word
        ),
        AnnotationKind::Suspicious => format!(
            "\"{}\" is a loaded term often used in misleading articles to evoke emotional responses.",
            word
        ),
    }
}

/// A run of source text, highlighted or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Segment {
    Plain {
        text: String,
    },
    Highlighted {
        text: String,
        kind: AnnotationKind,
        explanation: String,
    },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } | Segment::Highlighted { text, .. } => text,
        }
    }
}

/// Disjoint spans ordered by offset, plus the text split into segments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotation {
    pub spans: Vec<AnnotationSpan>,
    pub segments: Vec<Segment>,
}

impl Annotation {
    /// Reassemble the text, wrapping each highlighted segment
    pub fn render_with_markers<O, C>(&self, open: O, close: C) -> String
    where
        O: Fn(&Segment) -> String,
        C: Fn(&Segment) -> String,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain { text } => out.push_str(text),
                Segment::Highlighted { text, .. } => {
                    out.push_str(&open(segment));
                    out.push_str(text);
                    out.push_str(&close(segment));
                }
            }
        }
        out
    }
}

/// Annotate `text` with the given problematic elements
pub fn annotate(text: &str, problematic: &ProblematicElements) -> Annotation {
    let tokens = text::tokenize(text);
    let lowered = tokens.lowercase_words();

    let mut seen = BTreeSet::new();
    let ordered = problematic
        .overused_words
        .iter()
        .map(|w| (w, AnnotationKind::Overused))
        .chain(
            problematic
                .suspicious_words
                .iter()
                .map(|w| (w, AnnotationKind::Suspicious)),
        );

    // Every occurrence of each distinct term, as byte ranges in text order
    let mut terms: Vec<(String, AnnotationKind, Vec<(usize, usize)>)> = Vec::new();
    for (term, kind) in ordered {
        let key = term.to_lowercase();
        if !seen.insert(key.clone()) {
            continue;
        }
        let words = term_words(&key);
        if words.is_empty() || words.len() > lowered.len() {
            continue;
        }
        let occurrences: Vec<(usize, usize)> = lowered
            .windows(words.len())
            .enumerate()
            .filter(|(_, w)| *w == words.as_slice())
            .map(|(i, _)| (tokens.words[i].start, tokens.words[i + words.len() - 1].end))
            .collect();
        if !occurrences.is_empty() {
            terms.push((key, kind, occurrences));
        }
    }

    // First occurrences: earliest start wins, longer span on ties
    let mut order: Vec<usize> = (0..terms.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, ea) = terms[a].2[0];
        let (sb, eb) = terms[b].2[0];
        sa.cmp(&sb).then(eb.cmp(&ea))
    });
    let mut chosen: Vec<(usize, (usize, usize))> = Vec::with_capacity(terms.len());
    let mut displaced = Vec::new();
    for i in order {
        let range = terms[i].2[0];
        if chosen.last().map_or(true, |(_, last)| range.0 >= last.1) {
            chosen.push((i, range));
        } else {
            displaced.push(i);
        }
    }

    // Displaced terms move to their first occurrence clear of every chosen span
    displaced.sort_unstable();
    for i in displaced {
        let free = terms[i].2[1..]
            .iter()
            .copied()
            .find(|&(s, e)| chosen.iter().all(|&(_, (cs, ce))| e <= cs || s >= ce));
        if let Some(range) = free {
            chosen.push((i, range));
        }
    }
    chosen.sort_by_key(|&(_, (start, _))| start);

    let spans: Vec<AnnotationSpan> = chosen
        .into_iter()
        .map(|(i, (start, end))| {
            let (word, kind, _) = &terms[i];
            AnnotationSpan {
                explanation: explanation(*kind, word),
                word: word.clone(),
                start,
                end,
                matched: text[start..end].to_string(),
                kind: *kind,
            }
        })
        .collect();

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in &spans {
        if span.start > cursor {
            segments.push(Segment::Plain {
                text: text[cursor..span.start].to_string(),
            });
        }
        segments.push(Segment::Highlighted {
            text: span.matched.clone(),
            kind: span.kind,
            explanation: span.explanation.clone(),
        });
        cursor = span.end;
    }
    if cursor < text.len() {
        segments.push(Segment::Plain {
            text: text[cursor..].to_string(),
        });
    }

    Annotation { spans, segments }
}
