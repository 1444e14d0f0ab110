//! The two fixed corpora and their per-corpus search parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::score::{Scorer, Weights};
use crate::segment::Segmenter;

/// One of the two searchable guides.
///
/// Each corpus carries its own boundary rule (see [`Segmenter`]) and its
/// own weights table (see [`Weights`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuideCorpus {
    /// The code migration guide. Every h2+ heading is a section.
    Guide,
    /// The data migration guide. Only `Phase`/`Step` headings split.
    DataGuide,
}

impl GuideCorpus {
    /// Both corpora, in a stable order.
    pub const ALL: [GuideCorpus; 2] = [GuideCorpus::Guide, GuideCorpus::DataGuide];

    /// The logical name used on the CLI, in config, and in tool names.
    pub fn name(self) -> &'static str {
        match self {
            GuideCorpus::Guide => "guide",
            GuideCorpus::DataGuide => "data-guide",
        }
    }

    /// The compiled segmenter for this corpus. Built once per process.
    pub fn segmenter(self) -> &'static Segmenter {
        static GUIDE: OnceLock<Segmenter> = OnceLock::new();
        static DATA_GUIDE: OnceLock<Segmenter> = OnceLock::new();

        match self {
            GuideCorpus::Guide => GUIDE.get_or_init(Segmenter::guide),
            GuideCorpus::DataGuide => DATA_GUIDE.get_or_init(Segmenter::data_guide),
        }
    }

    pub fn weights(self) -> Weights {
        match self {
            GuideCorpus::Guide => Weights::GUIDE,
            GuideCorpus::DataGuide => Weights::DATA_GUIDE,
        }
    }

    pub fn scorer(self) -> Scorer {
        Scorer::new(self.weights())
    }
}

impl fmt::Display for GuideCorpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by [`GuideCorpus::from_str`] for names other than `guide` and
/// `data-guide`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCorpus(pub String);

impl fmt::Display for UnknownCorpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown corpus '{}': expected 'guide' or 'data-guide'",
            self.0
        )
    }
}

impl std::error::Error for UnknownCorpus {}

impl FromStr for GuideCorpus {
    type Err = UnknownCorpus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guide" => Ok(GuideCorpus::Guide),
            "data-guide" => Ok(GuideCorpus::DataGuide),
            other => Err(UnknownCorpus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for corpus in GuideCorpus::ALL {
            assert_eq!(corpus.name().parse::<GuideCorpus>().unwrap(), corpus);
            assert_eq!(corpus.to_string(), corpus.name());
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "data_guide".parse::<GuideCorpus>().unwrap_err();
        assert_eq!(err, UnknownCorpus("data_guide".to_string()));
        assert!(err.to_string().contains("data-guide"));
    }

    #[test]
    fn test_deserialize_kebab_case() {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;

        let de: StrDeserializer<'_, Error> = "data-guide".into_deserializer();
        assert_eq!(GuideCorpus::deserialize(de).unwrap(), GuideCorpus::DataGuide);
    }

    #[test]
    fn test_weights_per_corpus() {
        assert_eq!(GuideCorpus::Guide.weights().code_block, None);
        assert_eq!(GuideCorpus::DataGuide.weights().code_block, Some(15));
        assert_eq!(GuideCorpus::DataGuide.weights().title_word, 60);
    }
}
