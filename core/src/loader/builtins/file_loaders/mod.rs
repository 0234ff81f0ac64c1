//! Module for loading the corpus from files.

mod utils;

pub mod file_once_loader;

pub use file_once_loader::{FileOnceLoader, FileOnceLoaderBuilder};
