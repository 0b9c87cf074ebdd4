use std::future::{ready, Ready};

use actix_web::{http::header::AUTHORIZATION, web, FromRequest, HttpRequest};

use crate::{
    auth::{Caller, Claims, JwtService},
    errors::{AppError, AppResult},
};

/// Extractor for a signed-in teacher. Fails with 401 when the bearer token is
/// missing or invalid.
#[derive(Debug, Clone)]
pub struct AuthenticatedTeacher {
    pub claims: Claims,
    pub access_token: String,
}

impl AuthenticatedTeacher {
    /// Store requests made on this teacher's behalf.
    pub fn caller(&self) -> Caller {
        Caller::signed_in(&self.access_token)
    }
}

/// Like [`AuthenticatedTeacher`] but lets anonymous requests through. A
/// present but invalid token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<AuthenticatedTeacher>);

fn bearer_token(req: &HttpRequest) -> AppResult<Option<String>> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(|t| Some(t.trim().to_string()))
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}

fn authenticate(req: &HttpRequest) -> AppResult<Option<AuthenticatedTeacher>> {
    let Some(token) = bearer_token(req)? else {
        return Ok(None);
    };

    let jwt_service = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

    let claims = jwt_service.validate_token(&token)?;

    Ok(Some(AuthenticatedTeacher {
        claims,
        access_token: token,
    }))
}

impl FromRequest for AuthenticatedTeacher {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authenticate(req).and_then(|auth| {
            auth.ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
        }))
    }
}

impl FromRequest for MaybeAuthenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authenticate(req).map(MaybeAuthenticated))
    }
}
