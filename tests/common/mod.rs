#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::RwLock;
use uuid::Uuid;

use quizboard_server::{
    app_state::AppState,
    auth::{Caller, IdentityProvider, JwtService},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        teacher::UserMetadata, Attempt, Identity, NewAttempt, NewQuiz, Question, Quiz,
        QuizUpdate, Registration, Session, Teacher,
    },
    repositories::{AttemptRepository, QuizRepository, TeacherRepository},
};

/// How the fake store treats quiz inserts.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    /// Acknowledge owned inserts whose teacher has no profile, but keep the
    /// row invisible.
    pub require_teacher_profile: bool,
    /// Acknowledge every quiz insert and keep every row invisible.
    pub reject_all_quizzes: bool,
    /// Stall owned inserts this long before acknowledging.
    pub owned_insert_delay: Option<Duration>,
}

#[derive(Default)]
struct State {
    quizzes: Vec<Quiz>,
    attempts: Vec<Attempt>,
    teachers: HashMap<String, Teacher>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Calls {
    pub quiz_inserts: usize,
    pub owned_quiz_inserts: usize,
    pub anonymous_quiz_inserts: usize,
    pub teacher_inserts: usize,
    /// Access token each quiz or profile call ran as, in call order.
    pub quiz_tokens: Vec<Option<String>>,
    pub teacher_tokens: Vec<Option<String>>,
}

fn token_of(caller: &Caller) -> Option<String> {
    caller.access_token().map(str::to_string)
}

/// Row store kept in memory, implementing every repository trait.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    calls: Arc<RwLock<Calls>>,
    policy: Arc<RwLock<Policy>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: Policy) -> Self {
        let store = Self::default();
        *store.policy.try_write().expect("fresh store lock") = policy;
        store
    }

    pub async fn set_policy(&self, policy: Policy) {
        *self.policy.write().await = policy;
    }

    pub async fn calls(&self) -> Calls {
        self.calls.read().await.clone()
    }

    pub async fn quizzes(&self) -> Vec<Quiz> {
        self.state.read().await.quizzes.clone()
    }

    pub async fn teacher(&self, id: &str) -> Option<Teacher> {
        self.state.read().await.teachers.get(id).cloned()
    }

    pub async fn seed_teacher(&self, teacher: Teacher) {
        self.state
            .write()
            .await
            .teachers
            .insert(teacher.id.clone(), teacher);
    }

    pub async fn seed_quiz(&self, title: &str, teacher_id: Option<&str>) -> String {
        let mut state = self.state.write().await;
        let id = Uuid::new_v4().to_string();
        state.quizzes.push(Quiz {
            id: id.clone(),
            title: title.to_string(),
            questions: sample_questions(),
            time_limit: 300,
            teacher_id: teacher_id.map(str::to_string),
            created_at: Utc::now(),
        });
        id
    }

    pub async fn seed_attempt(&self, quiz_id: &str, name: &str, score: u32, total: u32, time_taken: u32) {
        self.insert_attempt(&NewAttempt {
            quiz_id: quiz_id.to_string(),
            student_name: name.to_string(),
            score,
            total,
            time_taken,
        })
        .await;
    }

    async fn insert_attempt(&self, attempt: &NewAttempt) -> Attempt {
        let mut state = self.state.write().await;
        let row = Attempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: attempt.quiz_id.clone(),
            student_name: attempt.student_name.clone(),
            score: attempt.score,
            total: attempt.total,
            time_taken: attempt.time_taken,
            created_at: Utc::now(),
        };
        state.attempts.push(row.clone());
        row
    }
}

#[async_trait]
impl QuizRepository for InMemoryStore {
    async fn insert(&self, quiz: &NewQuiz, caller: &Caller) -> AppResult<()> {
        let policy = self.policy.read().await.clone();
        {
            let mut calls = self.calls.write().await;
            calls.quiz_inserts += 1;
            calls.quiz_tokens.push(token_of(caller));
            if quiz.teacher_id.is_some() {
                calls.owned_quiz_inserts += 1;
            } else {
                calls.anonymous_quiz_inserts += 1;
            }
        }

        if quiz.teacher_id.is_some() {
            if let Some(delay) = policy.owned_insert_delay {
                tokio::time::sleep(delay).await;
            }
        }

        let mut state = self.state.write().await;
        let hidden = policy.reject_all_quizzes
            || (policy.require_teacher_profile
                && quiz
                    .teacher_id
                    .as_ref()
                    .is_some_and(|t| !state.teachers.contains_key(t)));
        if hidden {
            return Ok(());
        }

        state.quizzes.push(Quiz {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            questions: quiz.questions.clone(),
            time_limit: quiz.time_limit,
            teacher_id: quiz.teacher_id.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn find_inserted(&self, quiz: &NewQuiz, caller: &Caller) -> AppResult<Option<Quiz>> {
        self.calls.write().await.quiz_tokens.push(token_of(caller));
        let state = self.state.read().await;
        Ok(state
            .quizzes
            .iter()
            .find(|q| q.id == quiz.id && q.title == quiz.title && q.teacher_id == quiz.teacher_id)
            .cloned())
    }

    async fn find_by_id(&self, id: &str, _caller: &Caller) -> AppResult<Option<Quiz>> {
        let state = self.state.read().await;
        Ok(state.quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn list_by_teacher(&self, teacher_id: &str, caller: &Caller) -> AppResult<Vec<Quiz>> {
        self.calls.write().await.quiz_tokens.push(token_of(caller));
        let state = self.state.read().await;
        Ok(state
            .quizzes
            .iter()
            .rev()
            .filter(|q| q.teacher_id.as_deref() == Some(teacher_id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, update: &QuizUpdate, caller: &Caller) -> AppResult<()> {
        self.calls.write().await.quiz_tokens.push(token_of(caller));
        let mut state = self.state.write().await;
        let quiz = state
            .quizzes
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| AppError::quiz_not_found(id))?;
        update.apply(quiz);
        Ok(())
    }

    async fn delete(&self, id: &str, caller: &Caller) -> AppResult<()> {
        self.calls.write().await.quiz_tokens.push(token_of(caller));
        let mut state = self.state.write().await;
        let before = state.quizzes.len();
        state.quizzes.retain(|q| q.id != id);
        if state.quizzes.len() == before {
            return Err(AppError::quiz_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryStore {
    async fn insert(&self, attempt: &NewAttempt) -> AppResult<Attempt> {
        Ok(self.insert_attempt(attempt).await)
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Attempt>> {
        let state = self.state.read().await;
        Ok(state
            .attempts
            .iter()
            .filter(|a| a.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn count_by_quizzes(&self, quiz_ids: &[String], _caller: &Caller) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .attempts
            .iter()
            .filter(|a| quiz_ids.contains(&a.quiz_id))
            .count() as i64)
    }
}

#[async_trait]
impl TeacherRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str, caller: &Caller) -> AppResult<Option<Teacher>> {
        self.calls.write().await.teacher_tokens.push(token_of(caller));
        Ok(self.state.read().await.teachers.get(id).cloned())
    }

    async fn insert(&self, teacher: &Teacher, caller: &Caller) -> AppResult<()> {
        {
            let mut calls = self.calls.write().await;
            calls.teacher_inserts += 1;
            calls.teacher_tokens.push(token_of(caller));
        }
        let mut state = self.state.write().await;
        if state.teachers.contains_key(&teacher.id) {
            return Err(AppError::AlreadyExists(format!(
                "Teacher '{}' already exists",
                teacher.id
            )));
        }
        state.teachers.insert(teacher.id.clone(), teacher.clone());
        Ok(())
    }
}

/// Identity provider that knows a fixed set of access tokens.
#[derive(Clone, Default)]
pub struct FakeIdentityProvider {
    sessions: Arc<RwLock<HashMap<String, Identity>>>,
    lookups: Arc<RwLock<usize>>,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_session(&self, access_token: &str, identity: Identity) {
        self.sessions
            .write()
            .await
            .insert(access_token.to_string(), identity);
    }

    pub async fn lookups(&self) -> usize {
        *self.lookups.read().await
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_up(&self, email: &str, _password: &str, full_name: &str) -> AppResult<Registration> {
        let identity = Identity {
            id: format!("user-{}", email),
            email: Some(email.to_string()),
            user_metadata: UserMetadata {
                full_name: Some(full_name.to_string()),
            },
        };
        let access_token = format!("token-{}", email);
        self.add_session(&access_token, identity.clone()).await;
        Ok(Registration {
            user: identity,
            access_token: Some(access_token),
        })
    }

    async fn sign_in(&self, email: &str, _password: &str) -> AppResult<Session> {
        let token = format!("token-{}", email);
        let user = self
            .sessions
            .read()
            .await
            .get(&token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Invalid login credentials".to_string()))?;
        Ok(Session {
            access_token: token,
            refresh_token: None,
            expires_in: Some(3600),
            user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.sessions.write().await.remove(access_token);
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> AppResult<Option<Identity>> {
        *self.lookups.write().await += 1;
        Ok(self.sessions.read().await.get(access_token).cloned())
    }
}

pub fn identity(id: &str, email: &str, full_name: Option<&str>) -> Identity {
    Identity {
        id: id.to_string(),
        email: Some(email.to_string()),
        user_metadata: UserMetadata {
            full_name: full_name.map(str::to_string),
        },
    }
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new("x + 1 = 2, x = ?", &["0", "1"], 1),
        Question::new("2x = 8, x = ?", &["4", "6"], 0).with_explanation("Divide both sides by 2."),
    ]
}

pub const JWT_SECRET: &str = "integration_test_jwt_secret_0123456789";

pub fn test_config() -> Config {
    let mut config = Config::from_env();
    config.supabase_jwt_secret = SecretString::from(JWT_SECRET.to_string());
    config.app_origin = "https://app.example.com".to_string();
    config.remote_timeout_secs = 1;
    config.default_time_limit = 600;
    config
}

pub fn app_state(store: &InMemoryStore, identity: &FakeIdentityProvider) -> AppState {
    AppState::with_collaborators(
        test_config(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(identity.clone()),
    )
}

pub fn jwt_service() -> JwtService {
    JwtService::new(&SecretString::from(JWT_SECRET.to_string()))
}
