//! Guide search entry points and response formatting.
//!
//! The ranking itself lives in `guide-search-core`. This module turns a
//! ranked result list into the markdown text returned by the
//! `search-guide` / `search-data-guide` tools, and implements the
//! `migration-mcp search` and `migration-mcp sections` CLI commands.

use anyhow::Result;
use std::fmt::Write as _;

use guide_search_core::{sections, GuideCorpus, SearchResult};

use crate::config::Config;
use crate::guide::GuideStore;

/// Query ideas offered when a search finds nothing.
fn suggestions(corpus: GuideCorpus) -> &'static str {
    match corpus {
        GuideCorpus::Guide => {
            "- API names: \"streamText\", \"useChat\", \"generateObject\"\n\
             - Features: \"tools\", \"streaming\", \"messages\"\n\
             - Specific changes: \"maxSteps\", \"message structure\", \"imports\""
        }
        GuideCorpus::DataGuide => {
            "- Phases: \"Phase 1\", \"Phase 2\", \"runtime conversion\"\n\
             - Steps: \"conversion functions\", \"dual write\", \"schema migration\"\n\
             - Topics: \"database\", \"messages\", \"v4 to v5\", \"persisted data\""
        }
    }
}

fn heading(corpus: GuideCorpus, query: &str) -> String {
    match corpus {
        GuideCorpus::Guide => format!("# Search Results for \"{}\"", query),
        GuideCorpus::DataGuide => format!("# Data Migration Guide Results for \"{}\"", query),
    }
}

/// Render ranked results as the markdown answer of a search tool.
///
/// Shows at most `limit` results. With no results, returns a
/// "No results found" message with corpus-specific query suggestions
/// rather than an empty listing.
pub fn format_search_response(
    corpus: GuideCorpus,
    query: &str,
    results: &[SearchResult],
    limit: usize,
) -> String {
    if results.is_empty() {
        return format!(
            "No results found for \"{}\".\n\nTry searching for:\n{}",
            query,
            suggestions(corpus)
        );
    }

    let top = &results[..limit.min(results.len())];
    let mut out = String::new();

    let _ = write!(out, "{}\n\n", heading(corpus, query));
    let _ = write!(
        out,
        "Found {} relevant section(s). Showing top {}:\n\n",
        results.len(),
        top.len()
    );
    out.push_str("---\n\n");

    for (i, result) in top.iter().enumerate() {
        let _ = write!(out, "## {}. {}\n\n", i + 1, result.title);
        let _ = write!(out, "{}\n\n", result.content);
        out.push_str("---\n\n");
    }

    out
}

/// CLI entry point for `migration-mcp search`.
pub async fn run_search(
    config: &Config,
    corpus: GuideCorpus,
    query: &str,
    limit: Option<usize>,
    explain: bool,
) -> Result<()> {
    let store = GuideStore::from_config(&config.guides);
    let limit = config.search.clamp_limit(limit);

    let results = if explain {
        store.search_explained(corpus, query).await?
    } else {
        store.search(corpus, query).await?
    };
    tracing::debug!(%corpus, query, hits = results.len(), "search finished");

    if explain {
        for (i, result) in results.iter().take(limit).enumerate() {
            println!("{}. [{}] {}", i + 1, result.relevance, result.title);
            if let Some(b) = result.explain {
                println!(
                    "    scoring: title_phrase={} title_words={} body_phrase={} body_occurrences={} code_block={}",
                    b.title_phrase, b.title_words, b.body_phrase, b.body_occurrences, b.code_block
                );
            }
        }
        if results.is_empty() {
            println!("No results.");
        }
        return Ok(());
    }

    print!("{}", format_search_response(corpus, query, &results, limit));
    Ok(())
}

/// CLI entry point for `migration-mcp sections`.
///
/// Lists every section of the corpus in document order, indented by
/// heading depth.
pub async fn run_sections(config: &Config, corpus: GuideCorpus) -> Result<()> {
    let store = GuideStore::from_config(&config.guides);
    let doc = store.document(corpus).await?;
    let all = sections(corpus, &doc);

    if all.is_empty() {
        println!("No sections.");
        return Ok(());
    }

    for section in &all {
        let indent = "  ".repeat(section.level().saturating_sub(2));
        println!("{}{}", indent, section.display_title());
    }
    println!();
    println!("{} section(s) in {}", all.len(), corpus);

    Ok(())
}
