//! Corpus-level search: segment, score, rank.
//!
//! These functions are pure. Calling them twice with the same document and
//! query yields identical output, and the document is only ever borrowed.

use crate::corpus::GuideCorpus;
use crate::rank::{rank, Scored, SearchResult};
use crate::score::Query;
use crate::segment::Section;

/// Search `document` as the given corpus.
///
/// Returns every section with a non-zero score, highest first, ties in
/// document order. An empty vector means nothing matched.
pub fn search(corpus: GuideCorpus, document: &str, query: &str) -> Vec<SearchResult> {
    run(corpus, document, query, false)
}

/// Like [`search`], with a per-signal score breakdown on every result.
pub fn search_explained(corpus: GuideCorpus, document: &str, query: &str) -> Vec<SearchResult> {
    run(corpus, document, query, true)
}

/// The sections of `document` under the corpus boundary rule.
pub fn sections(corpus: GuideCorpus, document: &str) -> Vec<Section<'_>> {
    corpus.segmenter().segment(document)
}

fn run(corpus: GuideCorpus, document: &str, query: &str, explain: bool) -> Vec<SearchResult> {
    let query = Query::parse(query);
    if !query.is_searchable() {
        return Vec::new();
    }

    let scorer = corpus.scorer();
    let scored = sections(corpus, document)
        .into_iter()
        .map(|section| Scored {
            breakdown: scorer.breakdown(&section, &query),
            section,
        })
        .collect();

    rank(scored, explain)
}
