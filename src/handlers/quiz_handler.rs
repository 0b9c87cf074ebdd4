use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{AuthenticatedTeacher, MaybeAuthenticated},
    errors::AppError,
    models::dto::{
        request::{CreateQuizRequest, LeaderboardQuery, SubmitAttemptRequest, UpdateQuizRequest},
        response::{CreateQuizResponse, MessageResponse},
    },
    services::quiz_service::{share_url, CreateQuizInput},
};

#[post("/api/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    auth: MaybeAuthenticated,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let mut input = CreateQuizInput::from(request);
    // Signed-in teachers own their quizzes unless another owner is named.
    if input.teacher_id.is_none() {
        input.teacher_id = auth.0.as_ref().map(|a| a.claims.sub.clone());
    }
    let access_token = auth.0.as_ref().map(|a| a.access_token.as_str());

    let id = state
        .quiz_service
        .create_quiz(input, access_token)
        .await
        .ok_or_else(|| {
            AppError::Unavailable("Quiz could not be saved. Please try again.".to_string())
        })?;

    Ok(HttpResponse::Created().json(CreateQuizResponse {
        share_url: share_url(&state.config.app_origin, &id),
        id,
    }))
}

#[get("/api/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[put("/api/quizzes/{id}")]
pub async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
    auth: AuthenticatedTeacher,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let quiz = state
        .quiz_service
        .update_quiz(&id, request.into(), &auth.claims, &auth.caller())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedTeacher,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id, &auth.claims, &auth.caller()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Quiz '{}' deleted", id))))
}

#[post("/api/quizzes/{id}/attempts")]
pub async fn submit_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let attempt = state
        .quiz_service
        .save_attempt(request.into_new_attempt(&id))
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}

#[get("/api/quizzes/{id}/leaderboard")]
pub async fn get_leaderboard(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<LeaderboardQuery>,
) -> HttpResponse {
    let mut board = state.leaderboard_service.project(&id).await;
    if let Some(search) = query.search.as_deref() {
        board = board.search(search);
    }
    HttpResponse::Ok().json(board)
}

#[get("/api/teachers/me/quizzes")]
pub async fn get_my_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedTeacher,
) -> Result<HttpResponse, AppError> {
    let quizzes = state
        .quiz_service
        .get_teacher_quizzes(auth.claims.teacher_id(), &auth.caller())
        .await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/teachers/me/stats")]
pub async fn get_my_stats(
    state: web::Data<AppState>,
    auth: AuthenticatedTeacher,
) -> Result<HttpResponse, AppError> {
    let stats = state
        .quiz_service
        .get_teacher_stats(auth.claims.teacher_id(), &auth.caller())
        .await?;
    Ok(HttpResponse::Ok().json(stats))
}
