//! One entry point per user command, wired over the cached indices.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    completion::CompletionModel,
    config::CompanionConfig,
    context::{assemble_scored, ANALYSIS_SEPARATOR, QA_SEPARATOR},
    corpus::{CorpusIndex, IndexCache},
    embeddings::EmbeddingModel,
    error::{Error, Result},
    generator::AnswerGenerator,
    loader::Loader,
    prompts::{Bindings, PromptTemplate},
    retriever::search,
    trivia::{parse_or_fallback, QuizSession, TriviaQuestion},
};

/// What an entity analysis is about; picks the analysis template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Character,
    Artifact,
}

impl EntityKind {
    fn template(self) -> PromptTemplate {
        match self {
            EntityKind::Character => PromptTemplate::CharacterAnalysis,
            EntityKind::Artifact => PromptTemplate::ArtifactAnalysis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralAnswer {
    pub answer: String,
    /// The context the answer was generated from.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub text: String,
    pub context: String,
}

pub struct Companion<E, C> {
    config: CompanionConfig,
    index: Arc<CorpusIndex>,
    embedding_model: E,
    generator: AnswerGenerator<C>,
    /// Used for entity analysis when set, e.g. a model sampling at a higher temperature.
    analysis_generator: Option<AnswerGenerator<C>>,
}

impl<E: EmbeddingModel, C: CompletionModel> Companion<E, C> {
    pub fn new(
        config: CompanionConfig,
        index: Arc<CorpusIndex>,
        embedding_model: E,
        completion_model: C,
    ) -> Self {
        Self {
            config,
            index,
            embedding_model,
            generator: AnswerGenerator::new(completion_model),
            analysis_generator: None,
        }
    }

    /// Routes entity analysis to `completion_model`; every other command keeps the default model.
    #[must_use]
    pub fn with_analysis_model(mut self, completion_model: C) -> Self {
        self.analysis_generator = Some(AnswerGenerator::new(completion_model));
        self
    }

    /// Takes the indices from `cache`, loading or building them on first use.
    pub async fn init<L: Loader + ?Sized>(
        config: CompanionConfig,
        cache: &IndexCache,
        loader: &L,
        embedding_model: E,
        completion_model: C,
    ) -> Result<Self> {
        let index = cache.get_or_load(&config, loader, &embedding_model).await?;
        Ok(Self::new(config, index, embedding_model, completion_model))
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn completion_model(&self) -> &C {
        self.generator.completion_model()
    }

    /// The model entity analysis is sent to.
    pub fn analysis_model(&self) -> &C {
        self.analysis_generator().completion_model()
    }

    fn analysis_generator(&self) -> &AnswerGenerator<C> {
        self.analysis_generator.as_ref().unwrap_or(&self.generator)
    }

    /// Answers in the voice of `character`, using only nearby segments tagged with that name.
    #[instrument(skip(self))]
    pub async fn character_answer(&self, question: &str, character: &str) -> Result<String> {
        let segments = search(
            &self.index.tagged,
            question,
            self.config.character_top_k,
            &self.embedding_model,
            Some(character),
        )
        .await?;
        self.generator
            .generate_in_character(&segments, question, character)
            .await
    }

    #[instrument(skip(self))]
    pub async fn general_answer(&self, question: &str) -> Result<GeneralAnswer> {
        let segments = search(
            &self.index.general,
            question,
            self.config.general_top_k,
            &self.embedding_model,
            None,
        )
        .await?;
        let context = assemble_scored(&segments, QA_SEPARATOR, None);
        let bindings = Bindings::new()
            .bind("context", context.clone())
            .bind("question", question);
        let answer = self
            .generator
            .generate(PromptTemplate::GeneralQa, &bindings)
            .await?;
        Ok(GeneralAnswer { answer, context })
    }

    pub async fn trivia_question(&self) -> Result<TriviaQuestion> {
        let mut rng = StdRng::from_entropy();
        self.trivia_question_with(&mut rng).await
    }

    /// Generates a question from one segment picked at random among those nearest to the
    /// configured trivia query.
    #[instrument(skip_all)]
    pub async fn trivia_question_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TriviaQuestion> {
        let segments = search(
            &self.index.general,
            &self.config.trivia_query,
            self.config.trivia_top_k,
            &self.embedding_model,
            None,
        )
        .await?;
        let Some(chosen) = segments.choose(rng) else {
            warn!("Index is empty, using fallback question");
            return Ok(TriviaQuestion::fallback());
        };
        let bindings = Bindings::new().bind("context", chosen.segment.text.clone());
        let raw = self
            .generator
            .generate(PromptTemplate::Trivia, &bindings)
            .await?;
        Ok(parse_or_fallback(&raw))
    }

    /// Analyses a character or artifact from the segments nearest to its name.
    ///
    /// # Errors
    /// `Error::EmptyName` for a blank name, `Error::NoInformation` when nothing is retrieved.
    #[instrument(skip(self))]
    pub async fn analyze(&self, name: &str, kind: EntityKind) -> Result<Analysis> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        let segments = search(
            &self.index.general,
            name,
            self.config.analysis_top_k,
            &self.embedding_model,
            None,
        )
        .await?;
        if segments.is_empty() {
            return Err(Error::NoInformation(name.to_string()));
        }
        let context = assemble_scored(
            &segments,
            ANALYSIS_SEPARATOR,
            Some(self.config.analysis_max_context),
        );
        let bindings = Bindings::new()
            .bind("context", context.clone())
            .bind("name", name);
        let text = self
            .analysis_generator()
            .generate(kind.template(), &bindings)
            .await?;
        Ok(Analysis { text, context })
    }

    pub async fn start_quiz(&self) -> Result<QuizSession> {
        let mut rng = StdRng::from_entropy();
        self.start_quiz_with(&mut rng).await
    }

    /// Generates questions until `quiz_length` distinct ones are collected or
    /// `quiz_max_attempts` generations have been made. Questions are distinct by text and options.
    #[instrument(skip_all)]
    pub async fn start_quiz_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<QuizSession> {
        let mut questions = Vec::new();
        let mut seen = HashSet::new();
        let mut attempts = 0;
        while questions.len() < self.config.quiz_length && attempts < self.config.quiz_max_attempts {
            let question = self.trivia_question_with(rng).await?;
            if seen.insert((question.question.clone(), question.options.clone())) {
                questions.push(question);
            }
            attempts += 1;
        }
        info!(questions = questions.len(), attempts, "Quiz ready");
        Ok(QuizSession::new(questions))
    }
}
