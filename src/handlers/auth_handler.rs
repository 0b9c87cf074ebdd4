use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedTeacher,
    errors::AppError,
    models::dto::{
        request::{SignInRequest, SignUpRequest},
        response::{AuthResponse, MessageResponse},
    },
};

#[post("/api/auth/signup")]
pub async fn sign_up(
    state: web::Data<AppState>,
    request: web::Json<SignUpRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let profile = state.auth_service.sign_up(request).await?;
    Ok(HttpResponse::Created().json(profile))
}

#[post("/api/auth/login")]
pub async fn sign_in(
    state: web::Data<AppState>,
    request: web::Json<SignInRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let session = state.auth_service.sign_in(request).await?;
    let profile = state.auth_service.session_profile(&session).await;
    Ok(HttpResponse::Ok().json(AuthResponse::from_session(session, profile)))
}

#[post("/api/auth/logout")]
pub async fn sign_out(
    state: web::Data<AppState>,
    auth: AuthenticatedTeacher,
) -> Result<HttpResponse, AppError> {
    state.auth_service.sign_out(&auth.access_token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Signed out")))
}

#[get("/api/auth/me")]
pub async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedTeacher,
) -> Result<HttpResponse, AppError> {
    let profile = state
        .auth_service
        .get_teacher_profile(auth.claims.teacher_id(), &auth.caller())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
