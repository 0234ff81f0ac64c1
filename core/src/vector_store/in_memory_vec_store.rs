use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

use super::{Distance, RetrievalResult, ScoredSegment, VectorStoreError};
use crate::{
    chunker::Segment,
    embeddings::{EmbedderError, Embedding, EmbeddingModel},
};

const FORMAT_VERSION: u32 = 1;

/// Exhaustive nearest-neighbour index over embedded segments.
///
/// Entries keep their insertion order; equal distances are ranked by that order so searches are
/// fully deterministic, including after a persist/load round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InMemoryVectorStore {
    format_version: u32,
    distance: Distance,
    embeddings: Vec<Embedding>,
}

impl InMemoryVectorStore {
    pub fn new(distance: Distance) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            distance,
            embeddings: Vec::new(),
        }
    }

    /// Embeds every segment, one call per segment, in order.
    #[instrument(skip_all, fields(segment_count = segments.len()))]
    pub async fn build<M: EmbeddingModel + ?Sized>(
        segments: Vec<Segment>,
        model: &M,
        distance: Distance,
    ) -> Result<Self, VectorStoreError> {
        let mut store = Self::new(distance);
        for segment in segments {
            let vector = model.embed(&segment.text).await?;
            store.insert(Embedding::new(segment, vector))?;
        }
        info!(entries = store.len(), "Built index");
        Ok(store)
    }

    pub fn from_embeddings(
        embeddings: Vec<Embedding>,
        distance: Distance,
    ) -> Result<Self, VectorStoreError> {
        let mut store = Self::new(distance);
        for embedding in embeddings {
            store.insert(embedding)?;
        }
        Ok(store)
    }

    fn insert(&mut self, embedding: Embedding) -> Result<(), VectorStoreError> {
        if let Some(expected) = self.dimensions() {
            if embedding.dimensions() != expected {
                return Err(EmbedderError::DimensionMismatch {
                    expected,
                    actual: embedding.dimensions(),
                }
                .into());
            }
        }
        self.embeddings.push(embedding);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.embeddings.first().map(Embedding::dimensions)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.embeddings.iter().map(|e| &e.segment)
    }

    /// Same vectors, with every tag set cleared.
    #[must_use]
    pub fn untagged(&self) -> Self {
        let embeddings = self
            .embeddings
            .iter()
            .map(|e| {
                let mut segment = e.segment.clone();
                segment.tags.clear();
                Embedding::new(segment, e.embedded_data.clone())
            })
            .collect();
        Self {
            format_version: FORMAT_VERSION,
            distance: self.distance,
            embeddings,
        }
    }

    /// The `n` entries closest to `query`, ascending by distance.
    pub fn top_n(&self, query: &[f64], n: usize) -> Result<RetrievalResult, VectorStoreError> {
        if let Some(expected) = self.dimensions() {
            if query.len() != expected {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }
        let mut scored: Vec<(f64, usize)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, e)| (self.distance.between(query, &e.embedded_data), i))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        scored.truncate(n);
        Ok(scored
            .into_iter()
            .map(|(distance, i)| ScoredSegment {
                segment: self.embeddings[i].segment.clone(),
                distance,
            })
            .collect())
    }

    /// Writes the index as JSON. The file is written next to `path` first and renamed into place.
    #[instrument(skip(self), fields(entries = self.len()))]
    pub async fn persist(&self, path: &Path) -> Result<(), VectorStoreError> {
        let io_err = |source: std::io::Error| VectorStoreError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let bytes = serde_json::to_vec(self)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp_path, path).await.map_err(io_err)?;
        info!(path = %path.display(), bytes = bytes.len(), "Persisted index");
        Ok(())
    }

    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, VectorStoreError> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|source| VectorStoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let store: Self = serde_json::from_slice(&raw)?;
        store.validate(path)?;
        debug!(entries = store.len(), "Loaded index");
        Ok(store)
    }

    fn validate(&self, path: &Path) -> Result<(), VectorStoreError> {
        let corrupted = |reason: String| VectorStoreError::Corrupted {
            path: path.display().to_string(),
            reason,
        };
        if self.format_version != FORMAT_VERSION {
            return Err(corrupted(format!(
                "unsupported format version {}",
                self.format_version
            )));
        }
        if let Some(expected) = self.dimensions() {
            if let Some(bad) = self.embeddings.iter().find(|e| e.dimensions() != expected) {
                return Err(corrupted(format!(
                    "segment {} has {} dimensions, expected {expected}",
                    bad.segment.id,
                    bad.dimensions()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HashingEmbedder;

    fn embedding(id: &str, data: Vec<f64>) -> Embedding {
        Embedding::new(Segment::new(id, format!("text of {id}"), "test"), data)
    }

    fn store() -> InMemoryVectorStore {
        InMemoryVectorStore::from_embeddings(
            vec![
                embedding("id1", vec![1.0, 2.0, 3.0]),
                embedding("id2", vec![4.0, 5.0, 6.0]),
                embedding("id3", vec![7.0, 8.0, 9.0]),
            ],
            Distance::Euclidean,
        )
        .unwrap()
    }

    fn ids(result: &RetrievalResult) -> Vec<&str> {
        result.iter().map(|s| s.segment.id.as_str()).collect()
    }

    #[test]
    fn test_top_n() {
        let top = store().top_n(&[1.0, 2.0, 3.0], 2).unwrap();
        assert_eq!(ids(&top), vec!["id1", "id2"]);
        assert_eq!(top[0].distance, 0.0);
        assert!(top[0].distance <= top[1].distance);
    }

    #[test]
    fn top_n_larger_than_store() {
        let top = store().top_n(&[9.0, 9.0, 9.0], 10).unwrap();
        assert_eq!(ids(&top), vec!["id3", "id2", "id1"]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let store = InMemoryVectorStore::from_embeddings(
            vec![embedding("b", vec![1.0, 0.0]), embedding("a", vec![-1.0, 0.0])],
            Distance::Euclidean,
        )
        .unwrap();
        assert_eq!(ids(&store.top_n(&[0.0, 0.0], 2).unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(matches!(
            store().top_n(&[1.0], 1),
            Err(VectorStoreError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        ));
        assert!(InMemoryVectorStore::from_embeddings(
            vec![embedding("a", vec![1.0]), embedding("b", vec![1.0, 2.0])],
            Distance::Cosine,
        )
        .is_err());
    }

    #[test]
    fn empty_store_returns_nothing() {
        let store = InMemoryVectorStore::new(Distance::Cosine);
        assert!(store.top_n(&[1.0, 2.0], 4).unwrap().is_empty());
    }

    #[test]
    fn untagged_clears_tags_only() {
        let tagged = Segment::new("s", "Frodo", "doc").with_tags(["Frodo".to_string()].into());
        let store = InMemoryVectorStore::from_embeddings(
            vec![Embedding::new(tagged, vec![1.0])],
            Distance::Euclidean,
        )
        .unwrap();
        let general = store.untagged();
        let segment = general.segments().next().unwrap();
        assert!(segment.tags.is_empty());
        assert_eq!(segment.text, "Frodo");
        assert_eq!(general.len(), store.len());
    }

    #[tokio::test]
    async fn build_embeds_every_segment_once() {
        let embedder = HashingEmbedder::default();
        let segments = vec![
            Segment::new("a", "Gandalf the Grey", "doc"),
            Segment::new("b", "Frodo of the Shire", "doc"),
        ];
        let store = InMemoryVectorStore::build(segments, &embedder, Distance::Euclidean)
            .await
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn persist_then_load_preserves_ordering() {
        let embedder = HashingEmbedder::default();
        let segments = (0..20)
            .map(|i| Segment::new(format!("doc#{i}"), format!("segment number {i} of the tale"), "doc"))
            .collect();
        let store = InMemoryVectorStore::build(segments, &embedder, Distance::Cosine)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("general_faiss_index.json");
        store.persist(&path).await.unwrap();
        let loaded = InMemoryVectorStore::load(&path).await.unwrap();
        assert_eq!(loaded, store);

        for query in ["tale", "segment number 7", "Mordor"] {
            let q = embedder.embed(query).await.unwrap();
            assert_eq!(
                ids(&store.top_n(&q, 5).unwrap()),
                ids(&loaded.top_n(&q, 5).unwrap())
            );
        }
    }

    #[tokio::test]
    async fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, b"not json").await.unwrap();
        assert!(matches!(
            InMemoryVectorStore::load(&path).await,
            Err(VectorStoreError::Serialization(_))
        ));
        assert!(matches!(
            InMemoryVectorStore::load(&dir.path().join("missing.json")).await,
            Err(VectorStoreError::Io { .. })
        ));
    }
}
