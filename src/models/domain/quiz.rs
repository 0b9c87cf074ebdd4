use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String, // Minted by the server before insert
    pub title: String,
    pub questions: Vec<Question>,
    pub time_limit: u32, // Seconds
    #[serde(default)]
    pub teacher_id: Option<String>, // None for anonymous/demo quizzes
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `quizzes` collection. The id is chosen here so the
/// row can be read back by exactly that id; `created_at` is set by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewQuiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
    pub time_limit: u32,
    pub teacher_id: Option<String>,
}

impl NewQuiz {
    pub fn new(title: &str, questions: Vec<Question>, time_limit: u32) -> Self {
        NewQuiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            questions,
            time_limit,
            teacher_id: None,
        }
    }

    pub fn owned_by(mut self, teacher_id: Option<&str>) -> Self {
        self.teacher_id = teacher_id.map(str::to_string);
        self
    }

    /// Same payload under a fresh id, for another insert attempt.
    pub fn reissue(&self) -> Self {
        NewQuiz {
            id: Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QuizUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

impl QuizUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.questions.is_none() && self.time_limit.is_none()
    }

    pub fn apply(&self, quiz: &mut Quiz) {
        if let Some(title) = &self.title {
            quiz.title = title.clone();
        }
        if let Some(questions) = &self.questions {
            quiz.questions = questions.clone();
        }
        if let Some(time_limit) = self.time_limit {
            quiz.time_limit = time_limit;
        }
    }
}
