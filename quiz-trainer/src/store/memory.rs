//! In-memory quiz storage.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::QuizError;
use crate::model::{validate, Quiz};
use crate::store::QuizStore;

/// Quiz store kept entirely in process memory.
///
/// Every session of a server shares one instance through an `Arc`. The async
/// mutex serializes operations, so two sessions editing the same quiz see
/// each other's writes in order.
///
/// `BTreeMap` keeps iteration in id order, which is the order `list` and
/// `play` snapshot.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    quizzes: BTreeMap<i64, Quiz>,
    last_id: i64,
}

impl MemoryStore {
    /// Creates an empty store. The first quiz gets id 1.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Quiz>, QuizError> {
        // Clone out so the lock is not held while the caller writes output.
        Ok(self.inner.lock().await.quizzes.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Quiz>, QuizError> {
        Ok(self.inner.lock().await.quizzes.get(&id).cloned())
    }

    async fn create(&self, question: &str, answer: &str) -> Result<Quiz, QuizError> {
        validate(question, answer)?;

        let mut inner = self.inner.lock().await;
        // Ids only ever grow; a deleted id is never handed out again.
        inner.last_id += 1;
        let quiz = Quiz {
            id: inner.last_id,
            question: question.to_string(),
            answer: answer.to_string(),
        };
        inner.quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn update(&self, id: i64, question: &str, answer: &str) -> Result<Quiz, QuizError> {
        let mut inner = self.inner.lock().await;
        let quiz = inner.quizzes.get_mut(&id).ok_or(QuizError::NotFound(id))?;
        validate(question, answer)?;

        quiz.question = question.to_string();
        quiz.answer = answer.to_string();
        Ok(quiz.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, QuizError> {
        Ok(self.inner.lock().await.quizzes.remove(&id).is_some())
    }
}
