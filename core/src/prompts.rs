//! Prompt templates and their rendering.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("template `{template}` requires `{name}` but it was not bound")]
    MissingBinding { template: &'static str, name: String },
    #[error("template `{template}` does not declare `{name}`")]
    UnexpectedBinding { template: &'static str, name: String },
    #[error("failed to render `{template}`: {message}")]
    Render {
        template: &'static str,
        message: String,
    },
}

const GENERAL_QA: &str = "You are an expert on 'The Lord of the Rings' lore. Answer questions about Middle-earth using the provided context. If you don't know the answer, just say you don't know.

Context:
---------
{{ context }}
---------
Question: {{ question }}
Helpful Answer:";

const CHARACTER_QA: &str = "You are roleplaying as {{ character }}, a key figure in 'The Lord of the Rings.' Respond in the style and tone of {{ character }}.

Use only the provided context to answer the question. If the context does not contain relevant information, respond as {{ character }} would, acknowledging that you don't know the answer.

Context:
---------
{{ context }}
---------
Question: {{ question }}
Helpful Answer:";

const TRIVIA: &str = "You are generating trivia questions about 'The Lord of the Rings.'
Generate one multiple-choice question with 4 options (A, B, C, D) and specify the correct answer.
Example format:
Question: [Your question here]
Options: A. [option1], B. [option2], C. [option3], D. [option4]
Answer: [one of [option1], [option2], [option3] or [option4]]

Context:
---------
{{ context }}
---------
Generate one trivia question:";

const CHARACTER_ANALYSIS: &str = "You are an expert on 'The Lord of the Rings.' Provide an analysis of the character '{{ name }}' based on the following context. Always respond in the example format below, and always summarize your response in 200 words or less.
(Example format:
History: []
Significance: []
Powers: [])

Context:
{{ context }}

Analysis (summarize in 200 words or less):";

const ARTIFACT_ANALYSIS: &str = "You are an expert on 'The Lord of the Rings.' Provide an analysis of the artifact '{{ name }}' based on the following context. Always respond in the example format below, and always summarize your response in 200 words or less.
(Example format:
History: []
Significance: []
Associated Characters: [])

Context:
{{ context }}

Explanation (max 200 words):";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptTemplate {
    GeneralQa,
    CharacterQa,
    Trivia,
    CharacterAnalysis,
    ArtifactAnalysis,
}

impl PromptTemplate {
    pub fn name(self) -> &'static str {
        match self {
            PromptTemplate::GeneralQa => "general_qa",
            PromptTemplate::CharacterQa => "character_qa",
            PromptTemplate::Trivia => "trivia",
            PromptTemplate::CharacterAnalysis => "character_analysis",
            PromptTemplate::ArtifactAnalysis => "artifact_analysis",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            PromptTemplate::GeneralQa => GENERAL_QA,
            PromptTemplate::CharacterQa => CHARACTER_QA,
            PromptTemplate::Trivia => TRIVIA,
            PromptTemplate::CharacterAnalysis => CHARACTER_ANALYSIS,
            PromptTemplate::ArtifactAnalysis => ARTIFACT_ANALYSIS,
        }
    }

    /// The placeholders a caller has to bind, no more and no fewer.
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            PromptTemplate::GeneralQa => &["context", "question"],
            PromptTemplate::CharacterQa => &["context", "question", "character"],
            PromptTemplate::Trivia => &["context"],
            PromptTemplate::CharacterAnalysis | PromptTemplate::ArtifactAnalysis => {
                &["context", "name"]
            }
        }
    }

    pub fn render(self, bindings: &Bindings) -> Result<String, PromptError> {
        let declared = self.placeholders();
        if let Some(missing) = declared.iter().find(|p| !bindings.0.contains_key(**p)) {
            return Err(PromptError::MissingBinding {
                template: self.name(),
                name: missing.to_string(),
            });
        }
        if let Some(extra) = bindings.0.keys().find(|k| !declared.contains(&k.as_str())) {
            return Err(PromptError::UnexpectedBinding {
                template: self.name(),
                name: extra.clone(),
            });
        }

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.render_str(self.source(), bindings)
            .map_err(|e| PromptError::Render {
                template: self.name(),
                message: e.to_string(),
            })
    }
}

/// Values for a template's placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, String>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_general_qa() {
        let prompt = PromptTemplate::GeneralQa
            .render(
                &Bindings::new()
                    .bind("context", "The Shire lies in Eriador.")
                    .bind("question", "Where is the Shire?"),
            )
            .unwrap();
        assert!(prompt.contains("Context:\n---------\nThe Shire lies in Eriador.\n---------"));
        assert!(prompt.ends_with("Question: Where is the Shire?\nHelpful Answer:"));
    }

    #[test]
    fn character_is_substituted_everywhere() {
        let prompt = PromptTemplate::CharacterQa
            .render(
                &Bindings::new()
                    .bind("context", "ctx")
                    .bind("question", "q")
                    .bind("character", "Gollum"),
            )
            .unwrap();
        assert_eq!(prompt.matches("Gollum").count(), 3);
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn context_is_not_interpreted() {
        let prompt = PromptTemplate::Trivia
            .render(&Bindings::new().bind("context", "{{ question }} <b>&</b>"))
            .unwrap();
        assert!(prompt.contains("{{ question }} <b>&</b>"));
    }

    #[test]
    fn bindings_must_match_declared_placeholders() {
        assert_eq!(
            PromptTemplate::CharacterAnalysis.render(&Bindings::new().bind("context", "c")),
            Err(PromptError::MissingBinding {
                template: "character_analysis",
                name: "name".to_string()
            })
        );
        assert_eq!(
            PromptTemplate::Trivia.render(&Bindings::new().bind("context", "c").bind("name", "n")),
            Err(PromptError::UnexpectedBinding {
                template: "trivia",
                name: "name".to_string()
            })
        );
    }

    #[test]
    fn analysis_templates_differ_by_kind() {
        let bindings = Bindings::new().bind("context", "c").bind("name", "Sting");
        let character = PromptTemplate::CharacterAnalysis.render(&bindings).unwrap();
        let artifact = PromptTemplate::ArtifactAnalysis.render(&bindings).unwrap();
        assert!(character.contains("character 'Sting'") && character.contains("Powers: []"));
        assert!(artifact.contains("artifact 'Sting'") && artifact.contains("Associated Characters: []"));
    }
}
