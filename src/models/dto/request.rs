use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{question::not_blank, NewAttempt, Question, QuizUpdate};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub title: String,

    #[validate(length(min = 1, message = "A quiz needs at least one question"), nested)]
    pub questions: Vec<Question>,

    #[validate(range(min = 1))]
    pub time_limit: Option<u32>,

    #[validate(length(min = 1))]
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub title: Option<String>,

    #[validate(length(min = 1), nested)]
    pub questions: Option<Vec<Question>>,

    #[validate(range(min = 1))]
    pub time_limit: Option<u32>,
}

impl From<UpdateQuizRequest> for QuizUpdate {
    fn from(request: UpdateQuizRequest) -> Self {
        QuizUpdate {
            title: request.title.map(|t| t.trim().to_string()),
            questions: request.questions,
            time_limit: request.time_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub student_name: String,

    pub score: u32,

    #[validate(range(min = 1))]
    pub total: u32,

    pub time_taken: u32,
}

impl SubmitAttemptRequest {
    pub fn into_new_attempt(self, quiz_id: &str) -> NewAttempt {
        NewAttempt {
            quiz_id: quiz_id.to_string(),
            student_name: self.student_name.trim().to_string(),
            score: self.score,
            total: self.total,
            time_taken: self.time_taken,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub search: Option<String>,
}
