//! Relevance scoring of a section against a query.
//!
//! The score is additive. Every signal compares lower-cased text:
//!
//! | Signal | Condition |
//! |--------|-----------|
//! | title phrase | the whole query is a substring of the title |
//! | title words | each query word found in the title |
//! | body phrase | the whole query is a substring of the body |
//! | body occurrences | every non-overlapping occurrence of each query word in the body |
//! | code block | the body contains a fenced code block |
//!
//! Matching is substring based, not token based: the word `call` also
//! counts inside `recall` and `toolCall`.
//!
//! Terms shorter than [`MIN_TERM_CHARS`] characters are ignored, for the
//! query words and for the whole-query phrase alike. A query with no such
//! term, like `"a"` or `""`, scores zero everywhere, code block included.
//!
//! Sums saturate at `u32::MAX`.

use serde::Serialize;

use crate::segment::Section;

/// Minimum number of characters for a query word (or the whole phrase) to
/// take part in matching.
pub const MIN_TERM_CHARS: usize = 3;

const CODE_FENCE: &str = "```";

/// Per-corpus weights for each scoring signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub title_phrase: u32,
    pub title_word: u32,
    pub body_phrase: u32,
    pub body_occurrence: u32,
    /// Bonus for sections with a fenced code block. `None` disables it.
    pub code_block: Option<u32>,
}

impl Weights {
    /// Code migration guide.
    pub const GUIDE: Weights = Weights {
        title_phrase: 100,
        title_word: 50,
        body_phrase: 30,
        body_occurrence: 10,
        code_block: None,
    };

    /// Data migration guide: procedural text, so body matches and code
    /// examples weigh more.
    pub const DATA_GUIDE: Weights = Weights {
        title_phrase: 100,
        title_word: 60,
        body_phrase: 40,
        body_occurrence: 12,
        code_block: Some(15),
    };
}

/// A normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    phrase: String,
    words: Vec<String>,
}

impl Query {
    /// Lower-case the query and split it into words. Words of fewer than
    /// [`MIN_TERM_CHARS`] characters are dropped; duplicates are kept and
    /// each copy scores on its own.
    ///
    /// The phrase is the lower-cased query as given, surrounding whitespace
    /// included.
    pub fn parse(raw: &str) -> Self {
        let phrase = raw.to_lowercase();
        let words = phrase
            .split_whitespace()
            .filter(|w| is_term(w))
            .map(str::to_string)
            .collect();

        Self { phrase, words }
    }

    /// The whole query, if its non-whitespace text is long enough to match
    /// as a phrase.
    pub fn phrase(&self) -> Option<&str> {
        is_term(self.phrase.trim()).then_some(self.phrase.as_str())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether any signal could fire for this query.
    pub fn is_searchable(&self) -> bool {
        self.phrase().is_some() || !self.words.is_empty()
    }
}

fn is_term(s: &str) -> bool {
    s.chars().count() >= MIN_TERM_CHARS
}

/// Points contributed by each signal. [`total`](ScoreBreakdown::total) is
/// the section's relevance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub title_phrase: u32,
    pub title_words: u32,
    pub body_phrase: u32,
    pub body_occurrences: u32,
    pub code_block: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        [
            self.title_words,
            self.body_phrase,
            self.body_occurrences,
            self.code_block,
        ]
        .into_iter()
        .fold(self.title_phrase, u32::saturating_add)
    }
}

/// Scores sections with a fixed [`Weights`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scorer {
    weights: Weights,
}

impl Scorer {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    /// Relevance of `section` for `query`. Zero means "not relevant".
    pub fn score(&self, section: &Section<'_>, query: &Query) -> u32 {
        self.breakdown(section, query).total()
    }

    /// Per-signal contributions for `section` and `query`.
    pub fn breakdown(&self, section: &Section<'_>, query: &Query) -> ScoreBreakdown {
        let mut b = ScoreBreakdown::default();
        if !query.is_searchable() {
            return b;
        }

        let w = &self.weights;
        let title = section.title.to_lowercase();
        let body = section.body.to_lowercase();

        if let Some(phrase) = query.phrase() {
            if title.contains(phrase) {
                b.title_phrase = w.title_phrase;
            }
            if body.contains(phrase) {
                b.body_phrase = w.body_phrase;
            }
        }

        for word in query.words() {
            if title.contains(word.as_str()) {
                b.title_words = b.title_words.saturating_add(w.title_word);
            }
            let occurrences = w
                .body_occurrence
                .saturating_mul(count_occurrences(&body, word));
            b.body_occurrences = b.body_occurrences.saturating_add(occurrences);
        }

        if let Some(bonus) = w.code_block {
            if section.body.contains(CODE_FENCE) {
                b.code_block = bonus;
            }
        }

        b
    }
}

/// Non-overlapping substring occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    u32::try_from(haystack.matches(needle).count()).unwrap_or(u32::MAX)
}
