use glob::glob;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::loader::LoaderError;

/// Expands glob patterns into a sorted, de-duplicated list of files. Matched directories are
/// walked recursively.
pub(super) fn resolve_input_to_files(inputs: &[String]) -> Result<Vec<PathBuf>, LoaderError> {
    let mut files = Vec::new();

    for input in inputs {
        for entry in glob(input)? {
            match entry {
                Ok(path) => {
                    if path.is_dir() {
                        for entry in WalkDir::new(&path) {
                            let entry = entry.map_err(|e| LoaderError::Io {
                                path: path.to_string_lossy().into_owned(),
                                source: e.into(),
                            })?;
                            if entry.file_type().is_file() {
                                files.push(entry.path().to_path_buf());
                            }
                        }
                    } else if path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => warn!(error = %e, "Glob error"),
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

pub(super) fn parse_file(file_path: &Path) -> Result<String, LoaderError> {
    let is_pdf = file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        parse_pdf(file_path)
    } else {
        std::fs::read_to_string(file_path).map_err(|source| LoaderError::Io {
            path: file_path.to_string_lossy().into_owned(),
            source,
        })
    }
}

#[cfg(feature = "pdf")]
fn parse_pdf(file_path: &Path) -> Result<String, LoaderError> {
    pdf_extract::extract_text(file_path).map_err(|e| LoaderError::Pdf {
        path: file_path.to_string_lossy().into_owned(),
        message: e.to_string(),
    })
}

#[cfg(not(feature = "pdf"))]
fn parse_pdf(file_path: &Path) -> Result<String, LoaderError> {
    Err(LoaderError::Pdf {
        path: file_path.to_string_lossy().into_owned(),
        message: "built without the `pdf` feature".to_string(),
    })
}
