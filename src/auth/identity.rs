use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Identity, Registration, Session},
};

/// The external identity provider. Everything behind it is opaque.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> AppResult<Registration>;
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session>;
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
    /// The identity behind an access token, `None` when the token is not
    /// accepted.
    async fn current_user(&self, access_token: &str) -> AppResult<Option<Identity>>;
}

pub struct GoTrueIdentityProvider {
    db: Database,
}

impl GoTrueIdentityProvider {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = ["msg", "error_description", "message", "error"]
            .iter()
            .find_map(|k| body.get(k).and_then(Value::as_str))
            .unwrap_or("Identity provider request failed")
            .to_string();

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::ValidationError(message)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(message),
            _ => AppError::Unavailable(format!("{}: {}", status, message)),
        }
    }
}

/// Sign-up answers with a session when email confirmation is off and with the
/// bare user otherwise.
pub fn registration_from_signup(body: Value) -> AppResult<Registration> {
    let access_token = body
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string);
    let user = match body.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => body,
    };
    let user: Identity = serde_json::from_value(user)?;

    Ok(Registration { user, access_token })
}

#[async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> AppResult<Registration> {
        let response = self
            .db
            .request(Method::POST, &self.db.auth_url("signup"), None)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        registration_from_signup(response.json().await?)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let response = self
            .db
            .request(Method::POST, &self.db.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let response = self
            .db
            .request(Method::POST, &self.db.auth_url("logout"), Some(access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> AppResult<Option<Identity>> {
        let response = self
            .db
            .request(Method::GET, &self.db.auth_url("user"), Some(access_token))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(Self::error_from(response).await),
        }
    }
}
