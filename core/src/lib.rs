//! # Lorekeeper
//!
//! Question answering and trivia generation grounded in a small, fixed corpus of documents.
//!
//! The pipeline runs in two phases:
//!
//! - **Build** (once per corpus): a [`loader::Loader`] produces documents, the
//!   [`chunker`] splits them into overlapping segments, the [`tagger`] labels each segment with the
//!   character names it mentions, and [`corpus::CorpusIndex`] embeds the segments into a general
//!   and a tagged [`vector_store::InMemoryVectorStore`], persisting both.
//! - **Query** (repeatedly): the [`retriever`] finds the nearest segments, the [`context`]
//!   assembler joins them, and the [`generator`] renders a [`prompts::PromptTemplate`] for the
//!   completion model. Trivia completions go through the [`trivia`] parser.
//!
//! Embedding and completion are ports ([`embeddings::EmbeddingModel`],
//! [`completion::CompletionModel`]); OpenAI implementations live in [`providers`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use lorekeeper::prelude::*;
//! use lorekeeper::providers::{completions::OpenAI, embeddings::OpenAIEmbedding};
//!
//! #[tokio::main]
//! async fn main() -> lorekeeper::error::Result<()> {
//!     let config = CompanionConfig::new(None)?;
//!     let loader = FileOnceLoaderBuilder::new(config.corpus_glob.clone())?.build();
//!     let cache = IndexCache::new();
//!     let companion = Companion::init(
//!         config,
//!         &cache,
//!         &loader,
//!         OpenAIEmbedding::new(None)?,
//!         OpenAI::new(None)?,
//!     )
//!     .await?;
//!
//!     println!("{}", companion.character_answer("What is your burden?", "Frodo").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature flags
//!
//! Name | Description | Default?
//! ---|---|---
//! `pdf` | enables the file loader to parse PDFs | Yes

pub mod chunker;

/// Command-level entry points
pub mod companion;

/// Completion model port
pub mod completion;

pub mod config;

/// Context assembly from retrieved segments
pub mod context;

pub mod corpus;

pub mod document;

/// Text embeddings support
pub mod embeddings;

/// Error types for all library operations
pub mod error;

pub mod generator;

/// Corpus loading utilities
pub mod loader;

pub mod prompts;

/// Builtin completion and embedding model providers
pub mod providers;

pub mod retriever;

pub mod tagger;

pub mod trivia;

/// Vector storage and retrieval
pub mod vector_store;

/// Convenience prelude exports
pub mod prelude;

#[cfg(test)]
pub(crate) mod testing;
