pub mod embedding;
pub mod model;

use thiserror::Error;

pub use embedding::Embedding;
pub use model::EmbeddingModel;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbedderError {
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Embedding has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
