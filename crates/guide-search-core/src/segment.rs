//! Heading-boundary segmentation of markdown guides.
//!
//! Splits a document into [`Section`]s, the unit of retrieval. Splitting is
//! a two-stage pure pipeline:
//!
//! 1. Find the byte offsets of every line that satisfies the corpus
//!    boundary rule.
//! 2. Slice the text into contiguous ranges between consecutive offsets,
//!    the last range running to the end of the document.
//!
//! Text before the first boundary belongs to no section and is dropped.
//! A bare `##` line with no title is not a boundary, so its text stays in
//! the enclosing section and nothing after the first boundary is lost.
//!
//! # Boundary rules
//!
//! | Corpus | Boundary line |
//! |--------|---------------|
//! | guide | `##`, `###`, `####`, ... followed by whitespace and a title |
//! | data-guide | `##` or `###`, whitespace, then `Phase` or `Step` and whitespace |
//!
//! The data-guide rule leaves `####` headings and non-procedural `##`/`###`
//! headings inside the enclosing Phase/Step section.
//!
//! # Example
//!
//! ```rust
//! use guide_search_core::Segmenter;
//!
//! let doc = "intro\n## One\nfirst\n### Two\nsecond\n";
//! let sections = Segmenter::guide().segment(doc);
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].title, "One");
//! assert_eq!(sections[1].heading_marker, "###");
//! assert_eq!(sections[1].body, "### Two\nsecond");
//! ```

use regex::Regex;

const GUIDE_BOUNDARY: &str = r"(?m)^#{2,}[ \t]+\S";
const GUIDE_HEADING: &str = r"^(#{2,})[ \t]+(.+)$";

const DATA_GUIDE_BOUNDARY: &str = r"(?m)^#{2,3}[ \t]+(?:Phase|Step)\s";
const DATA_GUIDE_HEADING: &str = r"^(#{2,3})[ \t]+(.+)$";

/// A titled, contiguous span of a document.
///
/// All fields borrow from the source document, so a section never outlives
/// the search call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// The literal `#` run of the heading line (e.g. `"###"`).
    pub heading_marker: &'a str,
    /// Heading text without the marker, trimmed.
    pub title: &'a str,
    /// Full section text, heading line included, trimmed.
    pub body: &'a str,
}

impl Section<'_> {
    /// Heading depth: the number of `#` characters in the marker.
    pub fn level(&self) -> usize {
        self.heading_marker.len()
    }

    /// The title as shown to callers, with the heading marker restored.
    pub fn display_title(&self) -> String {
        format!("{} {}", self.heading_marker, self.title)
    }
}

/// Splits documents at the lines matching a boundary rule.
#[derive(Debug, Clone)]
pub struct Segmenter {
    boundary: Regex,
    heading: Regex,
}

impl Segmenter {
    /// Build a segmenter from a boundary pattern (multi-line, anchored at
    /// line starts) and a heading pattern applied to each section's first
    /// line. The heading pattern must capture the marker as group 1 and the
    /// title as group 2.
    pub fn new(boundary: &str, heading: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            boundary: Regex::new(boundary)?,
            heading: Regex::new(heading)?,
        })
    }

    /// Segmenter for the code migration guide: every h2 or deeper heading.
    pub fn guide() -> Self {
        Self::new(GUIDE_BOUNDARY, GUIDE_HEADING).expect("guide patterns compile")
    }

    /// Segmenter for the data migration guide: h2/h3 `Phase` and `Step`
    /// headings only.
    pub fn data_guide() -> Self {
        Self::new(DATA_GUIDE_BOUNDARY, DATA_GUIDE_HEADING).expect("data guide patterns compile")
    }

    /// Byte offsets of every boundary line, in document order.
    pub fn boundaries(&self, text: &str) -> Vec<usize> {
        self.boundary.find_iter(text).map(|m| m.start()).collect()
    }

    /// Split `text` into sections. Total over any input: a document without
    /// qualifying headings yields an empty vector.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<Section<'a>> {
        let offsets = self.boundaries(text);

        offsets
            .iter()
            .enumerate()
            .filter_map(|(i, &start)| {
                let end = offsets.get(i + 1).copied().unwrap_or(text.len());
                self.parse_section(&text[start..end])
            })
            .collect()
    }

    fn parse_section<'a>(&self, chunk: &'a str) -> Option<Section<'a>> {
        let body = chunk.trim();
        if body.is_empty() {
            return None;
        }

        let first_line = chunk.split('\n').next().unwrap_or_default();
        let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);

        let caps = self.heading.captures(first_line)?;
        let heading_marker = caps.get(1)?.as_str();
        let title = caps.get(2)?.as_str().trim();

        Some(Section {
            heading_marker,
            title,
            body,
        })
    }
}
