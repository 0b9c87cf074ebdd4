pub mod auth_handler;
pub mod quiz_handler;

use actix_web::{get, web, HttpResponse};

pub use auth_handler::{me, sign_in, sign_out, sign_up};
pub use quiz_handler::{
    create_quiz, delete_quiz, get_leaderboard, get_my_quizzes, get_my_stats, get_quiz,
    submit_attempt, update_quiz,
};

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "quizboard-server",
    }))
}

/// Registers every route. Shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(create_quiz)
        .service(get_leaderboard)
        .service(submit_attempt)
        .service(get_quiz)
        .service(update_quiz)
        .service(delete_quiz)
        .service(get_my_quizzes)
        .service(get_my_stats)
        .service(sign_up)
        .service(sign_in)
        .service(sign_out)
        .service(me);
}
