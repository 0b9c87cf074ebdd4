use async_trait::async_trait;

use crate::{
    auth::Caller,
    db::{Database, Filter, Table},
    errors::AppResult,
    models::domain::{Attempt, NewAttempt},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn insert(&self, attempt: &NewAttempt) -> AppResult<Attempt>;
    /// All attempts for a quiz in creation order (`created_at`, then `id`).
    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Attempt>>;
    /// Attempts across all of `quiz_ids`, counted as `caller`.
    async fn count_by_quizzes(&self, quiz_ids: &[String], caller: &Caller) -> AppResult<i64>;
}

pub struct RestAttemptRepository {
    table: Table,
}

impl RestAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let table = db.table("attempts");
        Self { table }
    }
}

#[async_trait]
impl AttemptRepository for RestAttemptRepository {
    async fn insert(&self, attempt: &NewAttempt) -> AppResult<Attempt> {
        self.table.insert_returning(&[attempt]).await
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Attempt>> {
        let filter = Filter::new()
            .eq("quiz_id", quiz_id)
            .order("created_at", true)
            .order("id", true);
        self.table.find(&filter).await
    }

    async fn count_by_quizzes(&self, quiz_ids: &[String], caller: &Caller) -> AppResult<i64> {
        if quiz_ids.is_empty() {
            return Ok(0);
        }
        self.table
            .as_caller(caller)
            .count(&Filter::new().in_list("quiz_id", quiz_ids))
            .await
    }
}
