use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{chunker::Segment, embeddings::EmbedderError};

pub mod in_memory_vec_store;

pub use in_memory_vec_store::InMemoryVectorStore;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Failed to embed: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("Query has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to (de)serialize index: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Corrupted index {path}: {reason}")]
    Corrupted { path: String, reason: String },
}

/// Metric used to rank stored vectors against a query. Smaller is closer for both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    #[default]
    Euclidean,
    Cosine,
}

impl Distance {
    pub fn between(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Distance::Euclidean => euclidean_distance(a, b),
            Distance::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Zero vectors have similarity 0 with everything.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// A retrieved segment and its distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSegment {
    pub segment: Segment,
    pub distance: f64,
}

/// Segments ordered by ascending distance, at most `k` long.
pub type RetrievalResult = Vec<ScoredSegment>;
