//! # Guide Search Core
//!
//! Pure, I/O-free search engine behind the migration guide server.
//!
//! A markdown document is split into titled [`segment::Section`]s, each
//! section is scored against a [`score::Query`] with a per-corpus
//! [`score::Weights`] table, and the non-zero sections are ranked by
//! descending relevance with ties kept in document order.
//!
//! ```text
//!  document ──▶ Segmenter ──▶ Sections ──▶ Scorer ──▶ Ranker ──▶ results
//!                  ▲                          ▲
//!                  └────── GuideCorpus ───────┘
//!              (boundary rule)          (weights table)
//! ```
//!
//! This crate has no filesystem access, no async runtime, and no
//! configuration. Loading and caching the documents is the caller's job.
//!
//! # Example
//!
//! ```rust
//! use guide_search_core::{search, GuideCorpus};
//!
//! let doc = "# Guide\n\n## Streaming\n\nUse streamText for streaming.\n";
//! let results = search(GuideCorpus::Guide, doc, "streaming");
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].title, "## Streaming");
//! ```

pub mod corpus;
pub mod rank;
pub mod score;
pub mod search;
pub mod segment;

pub use corpus::{GuideCorpus, UnknownCorpus};
pub use rank::{rank, Scored, SearchResult};
pub use score::{Query, ScoreBreakdown, Scorer, Weights};
pub use search::{search, search_explained, sections};
pub use segment::{Section, Segmenter};
