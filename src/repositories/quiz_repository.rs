use async_trait::async_trait;

use crate::{
    auth::Caller,
    db::{Database, Filter, Table},
    errors::{AppError, AppResult},
    models::domain::{NewQuiz, Quiz, QuizUpdate},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Acknowledged insert. The row may still be invisible afterwards when an
    /// access policy rejects it silently.
    async fn insert(&self, quiz: &NewQuiz, caller: &Caller) -> AppResult<()>;
    /// The row written for `quiz`: same id, title and owner. Rows created by
    /// earlier inserts never match.
    async fn find_inserted(&self, quiz: &NewQuiz, caller: &Caller) -> AppResult<Option<Quiz>>;
    async fn find_by_id(&self, id: &str, caller: &Caller) -> AppResult<Option<Quiz>>;
    async fn list_by_teacher(&self, teacher_id: &str, caller: &Caller) -> AppResult<Vec<Quiz>>;
    async fn update(&self, id: &str, update: &QuizUpdate, caller: &Caller) -> AppResult<()>;
    async fn delete(&self, id: &str, caller: &Caller) -> AppResult<()>;
}

pub struct RestQuizRepository {
    table: Table,
}

impl RestQuizRepository {
    pub fn new(db: &Database) -> Self {
        let table = db.table("quizzes");
        Self { table }
    }
}

#[async_trait]
impl QuizRepository for RestQuizRepository {
    async fn insert(&self, quiz: &NewQuiz, caller: &Caller) -> AppResult<()> {
        self.table.as_caller(caller).insert(&[quiz]).await
    }

    async fn find_inserted(&self, quiz: &NewQuiz, caller: &Caller) -> AppResult<Option<Quiz>> {
        let filter = Filter::new()
            .eq("id", &quiz.id)
            .eq("title", &quiz.title)
            .eq_or_null("teacher_id", quiz.teacher_id.as_deref());
        self.table.as_caller(caller).find_one(&filter).await
    }

    async fn find_by_id(&self, id: &str, caller: &Caller) -> AppResult<Option<Quiz>> {
        self.table
            .as_caller(caller)
            .find_one(&Filter::new().eq("id", id))
            .await
    }

    async fn list_by_teacher(&self, teacher_id: &str, caller: &Caller) -> AppResult<Vec<Quiz>> {
        let filter = Filter::new()
            .eq("teacher_id", teacher_id)
            .order("created_at", false);
        self.table.as_caller(caller).find(&filter).await
    }

    async fn update(&self, id: &str, update: &QuizUpdate, caller: &Caller) -> AppResult<()> {
        let changed = self
            .table
            .as_caller(caller)
            .update(&Filter::new().eq("id", id), update)
            .await?;
        if changed == 0 {
            return Err(AppError::quiz_not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, id: &str, caller: &Caller) -> AppResult<()> {
        let deleted = self
            .table
            .as_caller(caller)
            .delete(&Filter::new().eq("id", id))
            .await?;
        if deleted == 0 {
            return Err(AppError::quiz_not_found(id));
        }
        Ok(())
    }
}
