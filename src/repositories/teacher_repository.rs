use async_trait::async_trait;

use crate::{
    auth::Caller,
    db::{Database, Filter, Table},
    errors::AppResult,
    models::domain::Teacher,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn find_by_id(&self, id: &str, caller: &Caller) -> AppResult<Option<Teacher>>;
    /// Profile rows are written as their own user; the store's policy
    /// refuses anonymous writes.
    async fn insert(&self, teacher: &Teacher, caller: &Caller) -> AppResult<()>;
}

pub struct RestTeacherRepository {
    table: Table,
}

impl RestTeacherRepository {
    pub fn new(db: &Database) -> Self {
        let table = db.table("teachers");
        Self { table }
    }
}

#[async_trait]
impl TeacherRepository for RestTeacherRepository {
    async fn find_by_id(&self, id: &str, caller: &Caller) -> AppResult<Option<Teacher>> {
        self.table
            .as_caller(caller)
            .find_one(&Filter::new().eq("id", id))
            .await
    }

    async fn insert(&self, teacher: &Teacher, caller: &Caller) -> AppResult<()> {
        self.table.as_caller(caller).insert(&[teacher]).await
    }
}
