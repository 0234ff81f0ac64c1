use tracing::{debug, info, instrument};

use crate::{
    completion::CompletionModel,
    context::{assemble_scored, QA_SEPARATOR},
    error::Error,
    prompts::{Bindings, PromptTemplate},
    vector_store::ScoredSegment,
};

/// Returned for in-character questions when no retrieved segment carries the character's tag.
pub const NOT_SURE: &str = "Sorry, I am not sure.";

/// Renders prompt templates and hands them to a completion model.
pub struct AnswerGenerator<C> {
    completion_model: C,
}

impl<C: CompletionModel> AnswerGenerator<C> {
    pub fn new(completion_model: C) -> Self {
        Self { completion_model }
    }

    pub fn completion_model(&self) -> &C {
        &self.completion_model
    }

    /// Returns the model's raw output for the rendered template.
    #[instrument(skip_all, fields(template = template.name()))]
    pub async fn generate(
        &self,
        template: PromptTemplate,
        bindings: &Bindings,
    ) -> Result<String, Error> {
        let prompt = template.render(bindings)?;
        debug!(prompt_len = prompt.len(), "Rendered prompt");
        Ok(self.completion_model.complete(&prompt).await?)
    }

    /// Answers as `character` from already-filtered segments.
    ///
    /// An empty `segments` short-circuits to [`NOT_SURE`] without calling the model.
    pub async fn generate_in_character(
        &self,
        segments: &[ScoredSegment],
        question: &str,
        character: &str,
    ) -> Result<String, Error> {
        if segments.is_empty() {
            info!(character, "No tagged context, answering with fallback");
            return Ok(NOT_SURE.to_string());
        }
        let bindings = Bindings::new()
            .bind("context", assemble_scored(segments, QA_SEPARATOR, None))
            .bind("question", question)
            .bind("character", character);
        self.generate(PromptTemplate::CharacterQa, &bindings).await
    }
}
