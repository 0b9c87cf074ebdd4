use std::sync::Arc;

use crate::{
    auth::{GoTrueIdentityProvider, IdentityProvider, JwtService},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AttemptRepository, QuizRepository, RestAttemptRepository, RestQuizRepository,
        RestTeacherRepository, TeacherRepository,
    },
    services::{
        auth_service::AuthService, leaderboard_service::LeaderboardService,
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub auth_service: Arc<AuthService>,
    pub jwt_service: JwtService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config)?;

        Ok(Self::with_collaborators(
            config,
            Arc::new(RestQuizRepository::new(&db)),
            Arc::new(RestAttemptRepository::new(&db)),
            Arc::new(RestTeacherRepository::new(&db)),
            Arc::new(GoTrueIdentityProvider::new(&db)),
        ))
    }

    /// Wires services over explicit store and identity clients.
    pub fn with_collaborators(
        config: Config,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
        teachers: Arc<dyn TeacherRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let timeout = config.remote_timeout();

        let quiz_service = Arc::new(
            QuizService::new(
                quizzes.clone(),
                attempts.clone(),
                teachers.clone(),
                identity.clone(),
                timeout,
            )
            .with_default_time_limit(config.default_time_limit),
        );
        let leaderboard_service = Arc::new(LeaderboardService::new(quizzes, attempts, timeout));
        let auth_service = Arc::new(AuthService::new(identity, teachers, timeout));

        Self {
            quiz_service,
            leaderboard_service,
            auth_service,
            jwt_service: JwtService::new(&config.supabase_jwt_secret),
            config: Arc::new(config),
        }
    }
}
