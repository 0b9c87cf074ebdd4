use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::{AppError, AppResult}, models::domain::teacher::UserMetadata};

pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Claims of an access token issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Identity provider user id
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Claims {
    pub fn new(sub: &str, email: &str, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: sub.to_string(),
            email: Some(email.to_string()),
            role: Some(AUTHENTICATED_AUDIENCE.to_string()),
            aud: AUTHENTICATED_AUDIENCE.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
            user_metadata: UserMetadata::default(),
        }
    }

    pub fn teacher_id(&self) -> &str {
        &self.sub
    }
}

pub fn require_owner(claims: &Claims, resource_owner: Option<&str>) -> AppResult<()> {
    if resource_owner != Some(claims.sub.as_str()) {
        return Err(AppError::Unauthorized(
            "You can only modify your own quizzes".to_string(),
        ));
    }
    Ok(())
}
