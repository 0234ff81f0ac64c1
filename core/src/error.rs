use crate::{
    chunker::ChunkerError, completion::CompletionError, config::ConfigError,
    embeddings::EmbedderError, loader::LoaderError, prompts::PromptError,
    vector_store::VectorStoreError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),
    #[error("Embedder error: {0}")]
    Embedder(#[from] EmbedderError),
    #[error("VectorStore error: {0}")]
    VectorStore(#[from] VectorStoreError),
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Chunker error: {0}")]
    Chunker(#[from] ChunkerError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("No information found for {0}")]
    NoInformation(String),
    #[error("A name is required")]
    EmptyName,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
