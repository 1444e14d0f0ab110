//! Turns scored sections into the ordered result list.

use serde::Serialize;

use crate::score::ScoreBreakdown;
use crate::segment::Section;

/// A section paired with its score for one query.
#[derive(Debug, Clone, Copy)]
pub struct Scored<'a> {
    pub section: Section<'a>,
    pub breakdown: ScoreBreakdown,
}

/// One ranked section, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Heading marker plus title, e.g. `"### Tool Invocation Structure Changes"`.
    pub title: String,
    /// Full section text including the heading line.
    pub content: String,
    /// Always greater than zero.
    pub relevance: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ScoreBreakdown>,
}

/// Drop zero-relevance sections and sort the rest by relevance, highest
/// first. The sort is stable: equal scores keep their document order.
///
/// No truncation happens here; limiting is up to the caller.
pub fn rank(scored: Vec<Scored<'_>>, explain: bool) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = scored
        .into_iter()
        .filter_map(|s| {
            let relevance = s.breakdown.total();
            (relevance > 0).then(|| SearchResult {
                title: s.section.display_title(),
                content: s.section.body.to_string(),
                relevance,
                explain: explain.then_some(s.breakdown),
            })
        })
        .collect();

    results.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    results
}
