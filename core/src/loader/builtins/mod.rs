/// Loaders reading the corpus from files.
pub mod file_loaders;
