use tracing::debug;

use crate::{
    embeddings::EmbeddingModel,
    vector_store::{InMemoryVectorStore, RetrievalResult, VectorStoreError},
};

/// Embeds `query` and returns the `k` nearest segments, ascending by distance.
///
/// With a `tag_filter`, the `k` nearest segments are found first and only then narrowed to those
/// carrying the tag. The result can therefore be shorter than `k`, or empty, even when matching
/// segments exist further away.
pub async fn search<M: EmbeddingModel + ?Sized>(
    index: &InMemoryVectorStore,
    query: &str,
    k: usize,
    model: &M,
    tag_filter: Option<&str>,
) -> Result<RetrievalResult, VectorStoreError> {
    let query_vector = model.embed(query).await?;
    let mut result = index.top_n(&query_vector, k)?;
    if let Some(tag) = tag_filter {
        result.retain(|scored| scored.segment.has_tag(tag));
    }
    debug!(k, tag = ?tag_filter, returned = result.len(), "Retrieved segments");
    Ok(result)
}
