//! Corpus loaders.
//!
//! A loader produces the full, immutable set of documents the index is built from. Loading runs
//! once per index build; there is no incremental or watching loader.

pub mod builtins;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::Document;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Invalid glob-pattern: {0}")]
    InvalidGlobPattern(#[from] glob::PatternError),
    #[error("No matching documents found for {0:?}")]
    NoMatchingDocuments(Vec<String>),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse PDF {path}: {message}")]
    Pdf { path: String, message: String },
}

#[async_trait]
pub trait Loader: Send + Sync {
    async fn retrieve(&self) -> Result<Vec<Document>, LoaderError>;
}

/// Serves a fixed set of in-memory documents.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    documents: Vec<Document>,
}

impl StaticLoader {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl Loader for StaticLoader {
    async fn retrieve(&self) -> Result<Vec<Document>, LoaderError> {
        Ok(self.documents.clone())
    }
}
