use std::path::Path;

/// A raw text document as produced by a loader.
///
/// `source` identifies where the text came from (a file path for the builtin loaders) and is
/// carried onto every segment for provenance.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Document {
    pub source: String,
    pub data: String,
}

impl Document {
    pub fn new(source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            data: data.into(),
        }
    }

    pub fn from_path(path: &Path, data: String) -> Self {
        Self::new(path.to_string_lossy(), data)
    }
}
