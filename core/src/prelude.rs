pub use crate::companion::{Analysis, Companion, EntityKind, GeneralAnswer};
pub use crate::completion::{CompletionError, CompletionModel};
pub use crate::config::CompanionConfig;
pub use crate::corpus::{CorpusIndex, IndexCache};
pub use crate::document::Document;
pub use crate::embeddings::{EmbedderError, EmbeddingModel};
pub use crate::loader::{builtins::file_loaders::FileOnceLoaderBuilder, Loader, StaticLoader};
pub use crate::trivia::{QuizSession, TriviaQuestion};
