//! Deterministic stand-ins for the embedding and completion ports.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::completion::{CompletionError, CompletionModel};
use crate::embeddings::{EmbedderError, EmbeddingModel};

/// Bag-of-words embedder: each lowercased word bumps one of `dimensions` buckets.
pub(crate) struct HashingEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimensions: 32,
            calls: AtomicUsize::new(0),
        }
    }
}

impl HashingEmbedder {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingModel for HashingEmbedder {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0; self.dimensions];
        for word in data.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % self.dimensions as u64) as usize] += 1.0;
        }
        Ok(vector)
    }
}

/// Fails every call.
pub(crate) struct FailingEmbedder;

#[async_trait]
impl EmbeddingModel for FailingEmbedder {
    async fn embed(&self, _data: &str) -> Result<Vec<f64>, EmbedderError> {
        Err(EmbedderError::ProviderError("offline".to_string()))
    }
}

/// Replays queued completions, then repeats `fallback`. Records every prompt it receives.
pub(crate) struct ScriptedCompletion {
    queue: Mutex<VecDeque<String>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub(crate) fn new(fallback: impl Into<String>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_queue<I, S>(responses: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scripted = Self::new(fallback);
        scripted
            .queue
            .lock()
            .unwrap()
            .extend(responses.into_iter().map(Into::into));
        scripted
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.queue.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}
