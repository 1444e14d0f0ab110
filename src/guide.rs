//! Read-once document store for the two migration guides.
//!
//! [`GuideStore`] owns one lazily filled cell per corpus. The first call to
//! [`GuideStore::document`] for a corpus loads it through the injected
//! [`DocumentLoader`]; every later call returns the cached text. The cache
//! is never invalidated for the life of the store.
//!
//! A failed load is returned to the caller and leaves the cell empty, so a
//! missing file is reported on every call until it appears, and is never
//! cached as an empty document.
//!
//! # Loaders
//!
//! | Loader | Use |
//! |--------|-----|
//! | [`FsLoader`] | Reads the paths from `[guides]` in the config |
//! | [`InMemoryLoader`] | Fixed strings, for tests and embedding |

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

use guide_search_core::{search, search_explained, GuideCorpus, SearchResult};

use crate::config::GuidesConfig;

/// Errors raised while fetching a guide document.
#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    #[error("failed to load {corpus} from {}: {source}", .path.display())]
    Load {
        corpus: GuideCorpus,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no document registered for {0}")]
    Missing(GuideCorpus),
}

/// Source of the raw markdown for each corpus.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, corpus: GuideCorpus) -> Result<String, GuideError>;
}

/// Loads guides from the filesystem.
#[derive(Debug, Clone)]
pub struct FsLoader {
    guide: PathBuf,
    data_guide: PathBuf,
}

impl FsLoader {
    pub fn new(guide: PathBuf, data_guide: PathBuf) -> Self {
        Self { guide, data_guide }
    }

    pub fn from_config(config: &GuidesConfig) -> Self {
        Self::new(
            config.path(GuideCorpus::Guide).to_path_buf(),
            config.path(GuideCorpus::DataGuide).to_path_buf(),
        )
    }

    fn path(&self, corpus: GuideCorpus) -> &PathBuf {
        match corpus {
            GuideCorpus::Guide => &self.guide,
            GuideCorpus::DataGuide => &self.data_guide,
        }
    }
}

#[async_trait]
impl DocumentLoader for FsLoader {
    async fn load(&self, corpus: GuideCorpus) -> Result<String, GuideError> {
        let path = self.path(corpus);
        tracing::debug!(%corpus, path = %path.display(), "reading guide");

        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| GuideError::Load {
                corpus,
                path: path.clone(),
                source,
            })
    }
}

/// Serves fixed documents from memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    docs: HashMap<GuideCorpus, String>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, corpus: GuideCorpus, text: impl Into<String>) -> Self {
        self.docs.insert(corpus, text.into());
        self
    }
}

#[async_trait]
impl DocumentLoader for InMemoryLoader {
    async fn load(&self, corpus: GuideCorpus) -> Result<String, GuideError> {
        self.docs
            .get(&corpus)
            .cloned()
            .ok_or(GuideError::Missing(corpus))
    }
}

/// Process-wide cache of the two guides.
pub struct GuideStore {
    loader: Arc<dyn DocumentLoader>,
    guide: OnceCell<Arc<str>>,
    data_guide: OnceCell<Arc<str>>,
}

impl GuideStore {
    pub fn new(loader: Arc<dyn DocumentLoader>) -> Self {
        Self {
            loader,
            guide: OnceCell::new(),
            data_guide: OnceCell::new(),
        }
    }

    /// Store backed by the guide files named in the config.
    pub fn from_config(config: &GuidesConfig) -> Self {
        Self::new(Arc::new(FsLoader::from_config(config)))
    }

    fn cell(&self, corpus: GuideCorpus) -> &OnceCell<Arc<str>> {
        match corpus {
            GuideCorpus::Guide => &self.guide,
            GuideCorpus::DataGuide => &self.data_guide,
        }
    }

    /// The full text of a corpus, loading it on first use.
    pub async fn document(&self, corpus: GuideCorpus) -> Result<Arc<str>, GuideError> {
        let doc = self
            .cell(corpus)
            .get_or_try_init(|| async move {
                let text = self.loader.load(corpus).await?;
                tracing::info!(%corpus, bytes = text.len(), "guide loaded");
                Ok::<_, GuideError>(Arc::from(text))
            })
            .await?;
        Ok(doc.clone())
    }

    /// Whether the corpus is already cached.
    pub fn is_loaded(&self, corpus: GuideCorpus) -> bool {
        self.cell(corpus).initialized()
    }

    /// Load both guides now rather than on first search.
    pub async fn preload(&self) -> Result<(), GuideError> {
        for corpus in GuideCorpus::ALL {
            self.document(corpus).await?;
        }
        Ok(())
    }

    /// Ranked sections of `corpus` for `query`. An empty vector means no
    /// section matched; an error means the guide could not be loaded.
    pub async fn search(
        &self,
        corpus: GuideCorpus,
        query: &str,
    ) -> Result<Vec<SearchResult>, GuideError> {
        let doc = self.document(corpus).await?;
        Ok(search(corpus, &doc, query))
    }

    /// Like [`search`](GuideStore::search) with score breakdowns attached.
    pub async fn search_explained(
        &self,
        corpus: GuideCorpus,
        query: &str,
    ) -> Result<Vec<SearchResult>, GuideError> {
        let doc = self.document(corpus).await?;
        Ok(search_explained(corpus, &doc, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const GUIDE: &str = "# Guide\n\n## Streaming\n\nstreamText streaming.\n";

    /// Counts loads and fails until `available` is set.
    struct FlakyLoader {
        calls: AtomicUsize,
        available: Mutex<bool>,
    }

    #[async_trait]
    impl DocumentLoader for FlakyLoader {
        async fn load(&self, corpus: GuideCorpus) -> Result<String, GuideError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.available.lock().unwrap() {
                Ok(GUIDE.to_string())
            } else {
                Err(GuideError::Load {
                    corpus,
                    path: PathBuf::from("missing.md"),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            }
        }
    }

    fn flaky(available: bool) -> Arc<FlakyLoader> {
        Arc::new(FlakyLoader {
            calls: AtomicUsize::new(0),
            available: Mutex::new(available),
        })
    }

    #[tokio::test]
    async fn test_loads_once() {
        let loader = flaky(true);
        let store = GuideStore::new(loader.clone());

        assert!(!store.is_loaded(GuideCorpus::Guide));
        for _ in 0..3 {
            store.search(GuideCorpus::Guide, "streaming").await.unwrap();
        }
        assert!(store.is_loaded(GuideCorpus::Guide));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_use_loads_once() {
        let loader = flaky(true);
        let store = Arc::new(GuideStore::new(loader.clone()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.search(GuideCorpus::Guide, "streaming").await
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap().len(), 1);
        }
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let loader = flaky(false);
        let store = GuideStore::new(loader.clone());

        let err = store.search(GuideCorpus::Guide, "streaming").await.unwrap_err();
        assert!(matches!(err, GuideError::Load { .. }));
        assert!(!store.is_loaded(GuideCorpus::Guide));

        *loader.available.lock().unwrap() = true;
        let results = store.search(GuideCorpus::Guide, "streaming").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_match_is_not_an_error() {
        let store = GuideStore::new(Arc::new(
            InMemoryLoader::new().with(GuideCorpus::Guide, GUIDE),
        ));
        let results = store.search(GuideCorpus::Guide, "embeddings").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_corpora_are_cached_independently() {
        let store = GuideStore::new(Arc::new(
            InMemoryLoader::new().with(GuideCorpus::Guide, GUIDE),
        ));
        store.document(GuideCorpus::Guide).await.unwrap();
        assert!(store.is_loaded(GuideCorpus::Guide));
        assert!(!store.is_loaded(GuideCorpus::DataGuide));

        let err = store.document(GuideCorpus::DataGuide).await.unwrap_err();
        assert!(matches!(err, GuideError::Missing(GuideCorpus::DataGuide)));
    }

    #[tokio::test]
    async fn test_fs_loader_reports_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let guide = tmp.path().join("guide.md");
        std::fs::write(&guide, GUIDE).unwrap();
        let missing = tmp.path().join("data.md");

        let store = GuideStore::new(Arc::new(FsLoader::new(guide, missing.clone())));
        assert_eq!(&*store.document(GuideCorpus::Guide).await.unwrap(), GUIDE);

        let err = store.preload().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("data-guide"), "{}", msg);
        assert!(msg.contains(&missing.display().to_string()), "{}", msg);
    }
}
