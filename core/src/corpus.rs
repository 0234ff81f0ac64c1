//! The pair of indices built from the corpus, and the process-wide cache holding them.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use crate::{
    chunker::split_all,
    config::CompanionConfig,
    document::Document,
    embeddings::EmbeddingModel,
    error::Result,
    loader::Loader,
    tagger::CharacterTagger,
    vector_store::InMemoryVectorStore,
};

/// The general (untagged) and tagged indices over the same segments.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusIndex {
    pub general: InMemoryVectorStore,
    pub tagged: InMemoryVectorStore,
}

impl CorpusIndex {
    /// Chunks, tags and embeds the documents. Each segment is embedded once; the general index
    /// shares the tagged index's vectors with the tags cleared.
    #[instrument(skip_all, fields(document_count = documents.len()))]
    pub async fn build<M: EmbeddingModel + ?Sized>(
        documents: &[Document],
        config: &CompanionConfig,
        model: &M,
    ) -> Result<Self> {
        let segments = split_all(documents, config.chunk_size, config.chunk_overlap)?;
        let tagger = CharacterTagger::new(config.characters.clone());
        let segments = tagger.apply_all(segments);
        info!(segment_count = segments.len(), "Chunked and tagged corpus");

        let tagged = InMemoryVectorStore::build(segments, model, config.distance).await?;
        let general = tagged.untagged();
        Ok(Self { general, tagged })
    }

    pub async fn persist(&self, config: &CompanionConfig) -> Result<()> {
        self.general.persist(&config.general_index_path()).await?;
        self.tagged.persist(&config.tagged_index_path()).await?;
        Ok(())
    }

    pub async fn load(config: &CompanionConfig) -> Result<Self> {
        let general = InMemoryVectorStore::load(&config.general_index_path()).await?;
        let tagged = InMemoryVectorStore::load(&config.tagged_index_path()).await?;
        Ok(Self { general, tagged })
    }

    pub fn persisted(config: &CompanionConfig) -> bool {
        config.general_index_path().is_file() && config.tagged_index_path().is_file()
    }

    /// Loads the persisted indices, or builds them from the loader's corpus, persists them and
    /// reads them back.
    #[instrument(skip_all)]
    pub async fn load_or_build<L, M>(config: &CompanionConfig, loader: &L, model: &M) -> Result<Self>
    where
        L: Loader + ?Sized,
        M: EmbeddingModel + ?Sized,
    {
        if Self::persisted(config) {
            info!(index_dir = %config.index_dir.display(), "Loading persisted indices");
            return Self::load(config).await;
        }
        let documents = loader.retrieve().await?;
        let built = Self::build(&documents, config, model).await?;
        built.persist(config).await?;
        Self::load(config).await
    }
}

/// Lazily initialized, shared `CorpusIndex`.
///
/// Concurrent first callers wait on a single initialization. A failed initialization leaves the
/// cache empty so a later call can retry. There is no invalidation; delete the persisted files
/// and restart to rebuild.
#[derive(Debug, Default)]
pub struct IndexCache {
    cell: OnceCell<Arc<CorpusIndex>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load<L, M>(
        &self,
        config: &CompanionConfig,
        loader: &L,
        model: &M,
    ) -> Result<Arc<CorpusIndex>>
    where
        L: Loader + ?Sized,
        M: EmbeddingModel + ?Sized,
    {
        self.cell
            .get_or_try_init(|| async {
                CorpusIndex::load_or_build(config, loader, model)
                    .await
                    .map(Arc::new)
            })
            .await
            .cloned()
    }

    pub fn get(&self) -> Option<Arc<CorpusIndex>> {
        self.cell.get().cloned()
    }
}
