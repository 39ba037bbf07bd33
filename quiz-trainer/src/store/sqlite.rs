//! SQLite-backed quiz storage.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::QuizError;
use crate::model::{validate, Quiz};
use crate::store::QuizStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS quizzes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Quiz store persisted in a single SQLite database.
///
/// `rusqlite::Connection` is blocking and not `Sync`, so it sits behind a
/// mutex and every query runs on tokio's blocking pool. `AUTOINCREMENT`
/// keeps ids of deleted quizzes from being reused.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened quiz database");
        Self::from_connection(conn)
    }

    /// A private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self, QuizError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, QuizError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, QuizError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, QuizError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| QuizError::Store("database connection poisoned".to_string()))?;
            op(&conn)
        })
        .await?
    }
}

fn quiz_from_row(row: &Row<'_>) -> rusqlite::Result<Quiz> {
    Ok(Quiz {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
    })
}

fn find(conn: &Connection, id: i64) -> Result<Option<Quiz>, QuizError> {
    let quiz = conn
        .query_row(
            "SELECT id, question, answer FROM quizzes WHERE id = ?1",
            params![id],
            quiz_from_row,
        )
        .optional()?;
    Ok(quiz)
}

#[async_trait]
impl QuizStore for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Quiz>, QuizError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, question, answer FROM quizzes ORDER BY id")?;
            let quizzes = stmt
                .query_map([], quiz_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(quizzes)
        })
        .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Quiz>, QuizError> {
        self.with_conn(move |conn| find(conn, id)).await
    }

    async fn create(&self, question: &str, answer: &str) -> Result<Quiz, QuizError> {
        validate(question, answer)?;
        let question = question.to_string();
        let answer = answer.to_string();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO quizzes (question, answer) VALUES (?1, ?2)",
                params![question, answer],
            )?;
            Ok(Quiz {
                id: conn.last_insert_rowid(),
                question,
                answer,
            })
        })
        .await
    }

    async fn update(&self, id: i64, question: &str, answer: &str) -> Result<Quiz, QuizError> {
        let question = question.to_string();
        let answer = answer.to_string();

        self.with_conn(move |conn| {
            if find(conn, id)?.is_none() {
                return Err(QuizError::NotFound(id));
            }
            validate(&question, &answer)?;

            conn.execute(
                "UPDATE quizzes SET question = ?1, answer = ?2, updated_at = datetime('now')
                 WHERE id = ?3",
                params![question, answer, id],
            )?;
            Ok(Quiz {
                id,
                question,
                answer,
            })
        })
        .await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, QuizError> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM quizzes WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
    }
}
