use crate::embeddings::EmbedderError;
use async_trait::async_trait;

/// Text in, fixed-length vector out.
///
/// Implementations are expected to be deterministic for a given text, otherwise query vectors
/// will not line up with the vectors stored at build time.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError>;
}

#[async_trait]
impl<T: EmbeddingModel + ?Sized> EmbeddingModel for std::sync::Arc<T> {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        (**self).embed(data).await
    }
}
