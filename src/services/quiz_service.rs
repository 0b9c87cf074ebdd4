use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    auth::{require_owner, Caller, Claims, IdentityProvider},
    errors::{AppError, AppResult},
    models::{
        domain::{Attempt, NewAttempt, NewQuiz, Question, Quiz, QuizUpdate, Teacher},
        dto::{request::CreateQuizRequest, response::TeacherStats},
    },
    repositories::{AttemptRepository, QuizRepository, TeacherRepository},
    services::timeout::with_timeout,
};

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 600;

#[derive(Debug, Clone)]
pub struct CreateQuizInput {
    pub title: String,
    pub questions: Vec<Question>,
    pub time_limit: Option<u32>,
    pub teacher_id: Option<String>,
}

impl From<CreateQuizRequest> for CreateQuizInput {
    fn from(request: CreateQuizRequest) -> Self {
        CreateQuizInput {
            title: request.title.trim().to_string(),
            questions: request.questions,
            time_limit: request.time_limit,
            teacher_id: request.teacher_id,
        }
    }
}

/// Link students open to start a quiz.
pub fn share_url(origin: &str, quiz_id: &str) -> String {
    format!("{}/quiz/{}/start", origin.trim_end_matches('/'), quiz_id)
}

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
    teachers: Arc<dyn TeacherRepository>,
    identity: Arc<dyn IdentityProvider>,
    remote_timeout: Duration,
    default_time_limit: u32,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
        teachers: Arc<dyn TeacherRepository>,
        identity: Arc<dyn IdentityProvider>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            teachers,
            identity,
            remote_timeout,
            default_time_limit: DEFAULT_TIME_LIMIT_SECS,
        }
    }

    pub fn with_default_time_limit(mut self, seconds: u32) -> Self {
        if seconds > 0 {
            self.default_time_limit = seconds;
        }
        self
    }

    async fn remote<T>(&self, operation: &str, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        with_timeout(self.remote_timeout, operation, call).await
    }

    /// Persists a quiz and returns its id once the row is confirmed visible.
    ///
    /// Tries, in order and at most once each: an insert owned by the teacher,
    /// the same insert after creating a missing teacher profile, and an
    /// insert with no owner. Every store call runs as the signed-in user when
    /// `access_token` is given. `None` means every attempt failed.
    pub async fn create_quiz(&self, input: CreateQuizInput, access_token: Option<&str>) -> Option<String> {
        let caller = Caller::from_token(access_token);
        let time_limit = input
            .time_limit
            .filter(|t| *t > 0)
            .unwrap_or(self.default_time_limit);
        let anonymous = NewQuiz::new(&input.title, input.questions, time_limit);

        if let Some(teacher_id) = input.teacher_id.as_deref() {
            let owned = anonymous.reissue().owned_by(Some(teacher_id));

            match self.insert_and_verify(&owned, &caller).await {
                Ok(id) => return Some(id),
                Err(e) => log::warn!("Owned insert of quiz '{}' for {} failed: {}", owned.title, teacher_id, e),
            }

            if self.repair_teacher_profile(teacher_id, &caller).await {
                match self.insert_and_verify(&owned.reissue(), &caller).await {
                    Ok(id) => {
                        log::info!("Quiz {} created after repairing profile of {}", id, teacher_id);
                        return Some(id);
                    }
                    Err(e) => log::warn!("Retried insert of quiz '{}' failed: {}", owned.title, e),
                }
            }
        }

        match self.insert_and_verify(&anonymous, &caller).await {
            Ok(id) => {
                if input.teacher_id.is_some() {
                    log::warn!("Quiz {} stored without an owner", id);
                }
                Some(id)
            }
            Err(e) => {
                log::error!("Quiz '{}' could not be created: {}", anonymous.title, e);
                None
            }
        }
    }

    async fn insert_and_verify(&self, quiz: &NewQuiz, caller: &Caller) -> AppResult<String> {
        self.remote("quiz insert", self.quizzes.insert(quiz, caller)).await?;

        let stored = self
            .remote("quiz verification", self.quizzes.find_inserted(quiz, caller))
            .await?;

        stored.map(|q| q.id).ok_or_else(|| {
            AppError::DatabaseError("insert acknowledged but the row is not visible".to_string())
        })
    }

    /// Creates the teacher profile when the signed-in identity is the
    /// requested owner and has none. Returns whether a retry is warranted.
    async fn repair_teacher_profile(&self, teacher_id: &str, caller: &Caller) -> bool {
        let Some(token) = caller.access_token() else {
            log::info!("No session available to repair profile of {}", teacher_id);
            return false;
        };

        let identity = match self.remote("identity lookup", self.identity.current_user(token)).await {
            Ok(Some(identity)) if identity.id == teacher_id => identity,
            Ok(_) => {
                log::warn!("Signed-in identity does not match teacher {}", teacher_id);
                return false;
            }
            Err(e) => {
                log::warn!("Identity lookup failed: {}", e);
                return false;
            }
        };

        match self
            .remote("profile lookup", self.teachers.find_by_id(teacher_id, caller))
            .await
        {
            Ok(Some(_)) => {
                log::info!("Profile of {} already exists", teacher_id);
                return false;
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Profile lookup for {} failed: {}", teacher_id, e);
                return false;
            }
        }

        let profile = Teacher::from_identity(&identity);
        match self
            .remote("profile insert", self.teachers.insert(&profile, caller))
            .await
        {
            Ok(()) => {
                log::info!("Created missing profile for {}", teacher_id);
                true
            }
            // Another request created it in the meantime.
            Err(AppError::AlreadyExists(_)) => true,
            Err(e) => {
                log::warn!("Could not create profile for {}: {}", teacher_id, e);
                false
            }
        }
    }

    /// Public lookup, as used by the quiz-start page.
    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.find_quiz(id, &Caller::anonymous()).await
    }

    async fn find_quiz(&self, id: &str, caller: &Caller) -> AppResult<Quiz> {
        self.remote("quiz lookup", self.quizzes.find_by_id(id, caller))
            .await?
            .ok_or_else(|| AppError::quiz_not_found(id))
    }

    pub async fn save_attempt(&self, attempt: NewAttempt) -> AppResult<Attempt> {
        if attempt.student_name.trim().is_empty() {
            return Err(AppError::ValidationError("Student name is required".to_string()));
        }
        if attempt.total == 0 {
            return Err(AppError::ValidationError("Total must be positive".to_string()));
        }
        if attempt.score > attempt.total {
            return Err(AppError::ValidationError(format!(
                "Score {} exceeds total {}",
                attempt.score, attempt.total
            )));
        }

        self.get_quiz(&attempt.quiz_id).await?;
        let saved = self.remote("attempt insert", self.attempts.insert(&attempt)).await?;
        log::info!("Recorded attempt {} on quiz {}", saved.id, saved.quiz_id);
        Ok(saved)
    }

    pub async fn get_teacher_quizzes(&self, teacher_id: &str, caller: &Caller) -> AppResult<Vec<Quiz>> {
        self.remote("teacher quizzes", self.quizzes.list_by_teacher(teacher_id, caller))
            .await
    }

    pub async fn get_teacher_stats(&self, teacher_id: &str, caller: &Caller) -> AppResult<TeacherStats> {
        let quizzes = self.get_teacher_quizzes(teacher_id, caller).await?;
        let ids: Vec<String> = quizzes.iter().map(|q| q.id.clone()).collect();
        let total_attempts = self
            .remote("attempt count", self.attempts.count_by_quizzes(&ids, caller))
            .await?;

        Ok(TeacherStats {
            total_quizzes: quizzes.len() as i64,
            total_attempts,
        })
    }

    pub async fn update_quiz(
        &self,
        id: &str,
        update: QuizUpdate,
        claims: &Claims,
        caller: &Caller,
    ) -> AppResult<Quiz> {
        if update.is_empty() {
            return Err(AppError::ValidationError("Nothing to update".to_string()));
        }

        let mut quiz = self.find_quiz(id, caller).await?;
        require_owner(claims, quiz.teacher_id.as_deref())?;

        self.remote("quiz update", self.quizzes.update(id, &update, caller))
            .await?;
        update.apply(&mut quiz);
        Ok(quiz)
    }

    pub async fn delete_quiz(&self, id: &str, claims: &Claims, caller: &Caller) -> AppResult<()> {
        let quiz = self.find_quiz(id, caller).await?;
        require_owner(claims, quiz.teacher_id.as_deref())?;

        self.remote("quiz delete", self.quizzes.delete(id, caller)).await
    }
}
