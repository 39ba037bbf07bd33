use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// A question/answer record as kept by a [`crate::store::QuizStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

impl Quiz {
    /// Whether `reply` matches the stored answer, ignoring case and
    /// surrounding whitespace.
    pub fn is_correct(&self, reply: &str) -> bool {
        normalize(reply) == normalize(&self.answer)
    }
}

/// A quiz that has not been stored yet, e.g. an entry of a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuiz {
    pub question: String,
    pub answer: String,
}

impl NewQuiz {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Checks the fields every store requires, collecting one message per bad
/// field.
pub fn validate(question: &str, answer: &str) -> Result<(), QuizError> {
    let mut problems = Vec::new();
    if question.trim().is_empty() {
        problems.push("question must not be empty".to_string());
    }
    if answer.trim().is_empty() {
        problems.push("answer must not be empty".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(QuizError::Validation(problems))
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
