use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{tagger::DEFAULT_CHARACTERS, vector_store::Distance};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to deserialize json config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for corpus loading, indexing and retrieval.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompanionConfig {
    pub corpus_glob: Vec<String>,
    pub index_dir: PathBuf,
    pub general_index_name: String,
    pub tagged_index_name: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub characters: Vec<String>,
    pub distance: Distance,
    pub character_top_k: usize,
    pub general_top_k: usize,
    pub trivia_top_k: usize,
    pub analysis_top_k: usize,
    pub analysis_max_context: usize,
    pub trivia_query: String,
    pub quiz_length: usize,
    pub quiz_max_attempts: usize,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            corpus_glob: vec!["docs/*.pdf".to_string()],
            index_dir: PathBuf::from("."),
            general_index_name: "general_faiss_index".to_string(),
            tagged_index_name: "llm_faiss_index".to_string(),
            chunk_size: 1000,
            chunk_overlap: 100,
            characters: DEFAULT_CHARACTERS.iter().map(|s| s.to_string()).collect(),
            distance: Distance::Euclidean,
            character_top_k: 10,
            general_top_k: 5,
            trivia_top_k: 10,
            analysis_top_k: 4,
            analysis_max_context: 2250,
            trivia_query: "Random trivia for LOTR".to_string(),
            quiz_length: 6,
            quiz_max_attempts: 20,
        }
    }
}

impl CompanionConfig {
    /// Parses an optional json config, falling back to the defaults when `None`.
    pub fn new(json_config: Option<&str>) -> Result<Self, ConfigError> {
        let config = match json_config {
            Some(json) => serde_json::from_str::<Self>(json)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(Some(&json))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be > 0".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::Invalid(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.characters.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "character names must not be empty".to_string(),
            ));
        }
        if self.general_index_name == self.tagged_index_name {
            return Err(ConfigError::Invalid(
                "general and tagged index names must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn general_index_path(&self) -> PathBuf {
        self.index_dir.join(format!("{}.json", self.general_index_name))
    }

    pub fn tagged_index_path(&self) -> PathBuf {
        self.index_dir.join(format!("{}.json", self.tagged_index_name))
    }
}
