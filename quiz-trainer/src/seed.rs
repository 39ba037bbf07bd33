//! Initial quizzes for an empty store.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::NewQuiz;
use crate::store::QuizStore;

/// The sample quizzes inserted by `--seed`.
pub fn defaults() -> Vec<NewQuiz> {
    vec![
        NewQuiz::new("Capital of Italy", "Rome"),
        NewQuiz::new("Capital of France", "Paris"),
        NewQuiz::new("Capital of Spain", "Madrid"),
        NewQuiz::new("Capital of Portugal", "Lisbon"),
    ]
}

/// Reads a JSON array of `{ "question": ..., "answer": ... }` objects.
pub async fn load_file(path: &Path) -> Result<Vec<NewQuiz>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("seed file {} is not a JSON list of quizzes", path.display()))
}

/// Inserts `quizzes` unless the store already holds something.
///
/// Returns how many quizzes were inserted.
pub async fn seed_if_empty(store: &dyn QuizStore, quizzes: &[NewQuiz]) -> Result<usize> {
    if !store.list_all().await?.is_empty() {
        info!("store already has quizzes, skipping seed");
        return Ok(0);
    }

    for quiz in quizzes {
        store
            .create(&quiz.question, &quiz.answer)
            .await
            .with_context(|| format!("failed to seed quiz '{}'", quiz.question))?;
    }
    info!(count = quizzes.len(), "seeded quiz store");
    Ok(quizzes.len())
}
