use std::{sync::Arc, time::Duration};

use crate::{
    auth::{Caller, IdentityProvider},
    errors::{AppError, AppResult},
    models::{
        domain::{Session, Teacher},
        dto::request::{SignInRequest, SignUpRequest},
    },
    repositories::TeacherRepository,
    services::timeout::with_timeout,
};

/// Thin wrapper around the identity provider plus the teacher profiles kept
/// in the row store.
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    teachers: Arc<dyn TeacherRepository>,
    remote_timeout: Duration,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        teachers: Arc<dyn TeacherRepository>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            identity,
            teachers,
            remote_timeout,
        }
    }

    /// Creates the identity, then the profile row. The profile insert runs as
    /// the new teacher when the provider handed back a session right away.
    pub async fn sign_up(&self, request: SignUpRequest) -> AppResult<Teacher> {
        let registration = with_timeout(
            self.remote_timeout,
            "sign up",
            self.identity
                .sign_up(&request.email, &request.password, &request.full_name),
        )
        .await?;

        let profile = Teacher {
            id: registration.user.id.clone(),
            email: request.email,
            full_name: request.full_name,
        };
        let caller = Caller::from_token(registration.access_token.as_deref());
        with_timeout(
            self.remote_timeout,
            "profile insert",
            self.teachers.insert(&profile, &caller),
        )
        .await?;

        log::info!("Signed up teacher {}", profile.id);
        Ok(profile)
    }

    pub async fn sign_in(&self, request: SignInRequest) -> AppResult<Session> {
        with_timeout(
            self.remote_timeout,
            "sign in",
            self.identity.sign_in(&request.email, &request.password),
        )
        .await
        .map_err(|e| {
            log::warn!("Login failed for {}: {}", request.email, e);
            e
        })
    }

    pub async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        with_timeout(self.remote_timeout, "sign out", self.identity.sign_out(access_token)).await
    }

    pub async fn get_teacher_profile(&self, teacher_id: &str, caller: &Caller) -> AppResult<Teacher> {
        with_timeout(
            self.remote_timeout,
            "profile lookup",
            self.teachers.find_by_id(teacher_id, caller),
        )
        .await?
            .ok_or_else(|| AppError::NotFound(format!("No profile for teacher '{}'", teacher_id)))
    }

    /// Profile of the signed-in teacher, or `None` when the profile row is
    /// missing or the lookup fails.
    pub async fn session_profile(&self, session: &Session) -> Option<Teacher> {
        self.get_teacher_profile(&session.user.id, &Caller::signed_in(&session.access_token))
            .await
            .ok()
    }
}
