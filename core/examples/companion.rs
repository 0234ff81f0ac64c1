//! Runs every command once against the corpus in `docs/`.
//!
//! Needs `LOREKEEPER_OPENAI_API_KEY` to be set. The first run builds and persists the indices,
//! later runs load them.

use lorekeeper::prelude::*;
use lorekeeper::providers::{completions::OpenAI, embeddings::OpenAIEmbedding};

#[tokio::main]
async fn main() -> lorekeeper::error::Result<()> {
    tracing_subscriber::fmt().init();

    let config = match std::env::args().nth(1) {
        Some(path) => CompanionConfig::from_file(std::path::Path::new(&path))?,
        None => CompanionConfig::new(None)?,
    };
    let loader = FileOnceLoaderBuilder::new(config.corpus_glob.clone())?.build();
    let cache = IndexCache::new();
    let companion = Companion::init(
        config,
        &cache,
        &loader,
        OpenAIEmbedding::new(None)?,
        OpenAI::new(None)?,
    )
    .await?
    .with_analysis_model(OpenAI::new(None)?.with_temperature(0.3));

    let answer = companion
        .character_answer("What did you find in the Shire?", "Gandalf")
        .await?;
    println!("Gandalf: {answer}\n");

    let expert = companion.general_answer("Who are the Nazgûl?").await?;
    println!("Answer: {}\n\nRetrieved Context:\n{}\n", expert.answer, expert.context);

    match companion.analyze("The One Ring", EntityKind::Artifact).await {
        Ok(analysis) => println!("{}\n", analysis.text),
        Err(lorekeeper::error::Error::NoInformation(name)) => {
            println!("No information found for {name}. Try another name.\n");
        }
        Err(e) => return Err(e),
    }

    let mut quiz = companion.start_quiz().await?;
    while let Some(question) = quiz.current().cloned() {
        println!("{}", question.question);
        for option in &question.options {
            println!("  {option}");
        }
        // always picks the first option
        let correct = quiz.answer(question.options[0].clone()).unwrap_or(false);
        println!("  -> {}\n", if correct { "Correct" } else { "Incorrect" });
    }
    println!("You scored {} out of {}.", quiz.score(), quiz.len());
    Ok(())
}
