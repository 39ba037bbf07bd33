//! Quiz persistence.
//!
//! Handlers only talk to the [`QuizStore`] trait. Two backends implement it:
//!
//! - [`MemoryStore`]: process-local, used when no database path is given and
//!   throughout the tests.
//! - [`SqliteStore`]: a single SQLite file, so quizzes survive restarts.
//!
//! Both validate with [`crate::model::validate`] and never reuse an id.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::QuizError;
use crate::model::Quiz;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Repository of quizzes shared by every session.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// All quizzes in ascending id order.
    async fn list_all(&self) -> Result<Vec<Quiz>, QuizError>;

    /// The quiz stored under `id`, if any.
    async fn get_by_id(&self, id: i64) -> Result<Option<Quiz>, QuizError>;

    /// Stores a new quiz and returns it with its assigned id.
    async fn create(&self, question: &str, answer: &str) -> Result<Quiz, QuizError>;

    /// Replaces both fields of an existing quiz.
    ///
    /// Fails with [`QuizError::NotFound`] when `id` is unknown.
    async fn update(&self, id: i64, question: &str, answer: &str) -> Result<Quiz, QuizError>;

    /// Removes a quiz. Returns `false` when nothing was stored under `id`.
    async fn delete_by_id(&self, id: i64) -> Result<bool, QuizError>;
}
