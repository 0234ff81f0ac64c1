use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::document::Document;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChunkerError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error("overlap ({overlap}) must be smaller than chunk size ({chunk_size})")]
    OverlapTooLarge { chunk_size: usize, overlap: usize },
}

/// A bounded slice of a document's text, the unit of retrieval.
///
/// Segments are produced once by [`split`], optionally tagged, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Stable identifier, `<source>#<ordinal>`.
    pub id: String,
    pub text: String,
    pub source: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Segment {
    pub fn new(id: impl Into<String>, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: source.into(),
            tags: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: BTreeSet<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Splits a document into segments of at most `chunk_size` characters where consecutive segments
/// share exactly `overlap` characters.
///
/// Lengths are counted in `char`s, so multi-byte text is never cut inside a code point.
pub fn split(
    document: &Document,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<Segment>, ChunkerError> {
    if chunk_size == 0 {
        return Err(ChunkerError::ZeroChunkSize);
    }
    if overlap >= chunk_size {
        return Err(ChunkerError::OverlapTooLarge {
            chunk_size,
            overlap,
        });
    }

    let chars: Vec<char> = document.data.chars().collect();
    let mut segments = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let text: String = chars[start..end].iter().collect();
        segments.push(Segment::new(
            format!("{}#{}", document.source, segments.len()),
            text,
            document.source.clone(),
        ));
        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }

    Ok(segments)
}

/// Splits every document, preserving document order.
pub fn split_all(
    documents: &[Document],
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<Segment>, ChunkerError> {
    let mut segments = Vec::new();
    for document in documents {
        segments.extend(split(document, chunk_size, overlap)?);
    }
    Ok(segments)
}
