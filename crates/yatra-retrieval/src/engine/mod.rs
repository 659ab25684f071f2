//! Search orchestration over the place corpus.
//!
//! `PlaceSearch` owns the corpus, the embedding provider and the vector index.
//! The first query (or an explicit [`PlaceSearch::initialize`]) runs the
//! capability bootstrap exactly once; every later query reads the result.

mod search;
mod stats;

use crate::config::SearchConfig;
use crate::lexical::LexicalScorer;
use crate::results::SearchMode;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};
use yatra_corpus::{CorpusBuilder, JsonDataset, PlaceSource};
use yatra_embeddings::EmbeddingProvider;
use yatra_index::VectorIndex;

pub use search::MAX_SEARCH_LIMIT;
pub use stats::SearchStats;

/// Progress of the one-shot capability bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    NotStarted,
    InProgress,
    Ready,
}

/// What the bootstrap managed to bring up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub embedding_available: bool,
    pub index_available: bool,
}

impl CapabilitySet {
    pub fn search_mode(&self) -> SearchMode {
        if self.index_available {
            SearchMode::Vector
        } else {
            SearchMode::Text
        }
    }
}

struct Capabilities {
    set: CapabilitySet,
    index: Option<VectorIndex>,
}

/// Clears the in-progress flag if the bootstrap unwinds.
struct StartedGuard<'a>(&'a AtomicBool);

impl Drop for StartedGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(false, Ordering::Release);
        }
    }
}

/// Place search with optional vector retrieval and lexical fallback.
pub struct PlaceSearch {
    pub(crate) corpus: CorpusBuilder,
    pub(crate) provider: EmbeddingProvider,
    pub(crate) config: SearchConfig,
    pub(crate) lexical: LexicalScorer,
    started: AtomicBool,
    capabilities: OnceLock<Capabilities>,
}

impl PlaceSearch {
    pub fn builder() -> PlaceSearchBuilder {
        PlaceSearchBuilder::default()
    }

    /// Search over the configured dataset, loading the embedding model from
    /// `config.embedding` unless vector search is disabled.
    pub fn from_config(config: SearchConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Run the capability bootstrap if it has not run yet.
    ///
    /// Concurrent callers block until the first one finishes; later calls
    /// return the stored result immediately.
    pub fn initialize(&self) -> CapabilitySet {
        self.ready().set
    }

    /// The bootstrap result, or `None` while it has not completed.
    pub fn capabilities(&self) -> Option<CapabilitySet> {
        self.capabilities.get().map(|c| c.set)
    }

    pub fn bootstrap_state(&self) -> BootstrapState {
        if self.capabilities.get().is_some() {
            BootstrapState::Ready
        } else if self.started.load(Ordering::Acquire) {
            BootstrapState::InProgress
        } else {
            BootstrapState::NotStarted
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn ready(&self) -> &Capabilities {
        self.capabilities.get_or_init(|| {
            self.started.store(true, Ordering::Release);
            let _running = StartedGuard(&self.started);
            self.bootstrap()
        })
    }

    fn index(&self) -> Option<&VectorIndex> {
        self.ready().index.as_ref()
    }

    fn bootstrap(&self) -> Capabilities {
        let start = Instant::now();
        info!("Bootstrapping place search");

        let corpus = self.corpus.load();
        let mut embedding_available = false;

        let index = if corpus.is_empty() {
            warn!("Place corpus is empty, vector index skipped");
            None
        } else if !self.config.vector_enabled {
            info!("Vector search disabled by configuration");
            None
        } else if !self.provider.is_available() {
            info!("Embedding model unavailable, using text search");
            None
        } else {
            embedding_available = true;
            let build = panic::catch_unwind(AssertUnwindSafe(|| {
                VectorIndex::build(corpus, &self.provider, self.config.batch_size)
            }));
            match build {
                Ok(Ok(index)) => Some(index),
                Ok(Err(e)) => {
                    warn!(error = %e, "Failed to build vector index, using text search");
                    None
                }
                Err(_) => {
                    warn!("Vector index build panicked, using text search");
                    None
                }
            }
        };

        let set = CapabilitySet {
            embedding_available,
            index_available: index.is_some(),
        };
        info!(
            places = corpus.len(),
            mode = %set.search_mode(),
            time_ms = start.elapsed().as_millis() as u64,
            "Place search ready"
        );

        Capabilities { set, index }
    }
}

/// Builder for [`PlaceSearch`]; anything left unset comes from the config.
#[derive(Default)]
pub struct PlaceSearchBuilder {
    source: Option<Arc<dyn PlaceSource>>,
    provider: Option<EmbeddingProvider>,
    config: Option<SearchConfig>,
}

impl PlaceSearchBuilder {
    pub fn source(mut self, source: Arc<dyn PlaceSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn embedding_provider(mut self, provider: EmbeddingProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> PlaceSearch {
        let config = self.config.unwrap_or_default();

        let source: Arc<dyn PlaceSource> = match (self.source, &config.dataset) {
            (Some(source), _) => source,
            (None, Some(path)) => Arc::new(JsonDataset::from_path(path)),
            (None, None) => Arc::new(JsonDataset::bundled()),
        };

        let provider = self.provider.unwrap_or_else(|| {
            if config.vector_enabled {
                EmbeddingProvider::from_config(config.embedding.clone())
            } else {
                EmbeddingProvider::disabled()
            }
        });

        PlaceSearch {
            corpus: CorpusBuilder::new(source),
            provider,
            config,
            lexical: LexicalScorer::new(),
            started: AtomicBool::new(false),
            capabilities: OnceLock::new(),
        }
    }
}
