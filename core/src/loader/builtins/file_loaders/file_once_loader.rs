use async_trait::async_trait;
use glob::Pattern;
use tracing::{debug, info, instrument};

use super::utils::{parse_file, resolve_input_to_files};
use crate::{
    document::Document,
    loader::{Loader, LoaderError},
};

/// A builder for constructing a `FileOnceLoader`.
///
/// It takes a list of glob patterns, checks that they are valid, and hands them to the loader
/// which resolves them to files when the corpus is retrieved.
pub struct FileOnceLoaderBuilder {
    glob_patterns: Vec<String>,
}

impl FileOnceLoaderBuilder {
    /// Creates a new `FileOnceLoaderBuilder` instance.
    ///
    /// # Errors
    /// Returns `LoaderError::InvalidGlobPattern` if any pattern fails to parse.
    pub fn new(glob_patterns: Vec<String>) -> Result<Self, LoaderError> {
        for pattern in &glob_patterns {
            Pattern::new(pattern)?;
        }
        Ok(Self { glob_patterns })
    }

    #[must_use]
    pub fn build(self) -> FileOnceLoader {
        FileOnceLoader {
            glob_patterns: self.glob_patterns,
        }
    }
}

/// Reads every file matching its patterns into one `Document` per file.
///
/// PDF files are parsed with `pdf-extract`, everything else is read as UTF-8 text.
pub struct FileOnceLoader {
    glob_patterns: Vec<String>,
}

#[async_trait]
impl Loader for FileOnceLoader {
    #[instrument(skip(self), fields(patterns = ?self.glob_patterns))]
    async fn retrieve(&self) -> Result<Vec<Document>, LoaderError> {
        let patterns = self.glob_patterns.clone();
        let documents = tokio::task::spawn_blocking(move || load_documents(&patterns))
            .await
            .map_err(|e| LoaderError::Io {
                path: String::new(),
                source: std::io::Error::other(e),
            })??;
        info!(document_count = documents.len(), "Loaded corpus");
        Ok(documents)
    }
}

fn load_documents(patterns: &[String]) -> Result<Vec<Document>, LoaderError> {
    let files = resolve_input_to_files(patterns)?;
    if files.is_empty() {
        return Err(LoaderError::NoMatchingDocuments(patterns.to_vec()));
    }
    files
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "Parsing file");
            parse_file(path).map(|data| Document::from_path(path, data))
        })
        .collect()
}
