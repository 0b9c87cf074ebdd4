use serde::Serialize;

use crate::models::domain::{Session, Teacher};

#[derive(Debug, Clone, Serialize)]
pub struct CreateQuizResponse {
    pub id: String,
    pub share_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeacherStats {
    pub total_quizzes: i64,
    pub total_attempts: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Teacher>,
}

impl AuthResponse {
    pub fn from_session(session: Session, profile: Option<Teacher>) -> Self {
        AuthResponse {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user_id: session.user.id,
            profile,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
