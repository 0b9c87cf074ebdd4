#[cfg(test)]
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::models::domain::{Attempt, NewQuiz, Question, Quiz};

    /// Two short algebra questions.
    pub fn sample_questions() -> Vec<Question> {
        vec![
            Question::new("x + 1 = 2, x = ?", &["0", "1"], 1),
            Question::new("2x = 8, x = ?", &["4", "6"], 0),
        ]
    }

    /// The row the store would hold after accepting `quiz`.
    pub fn stored_quiz(quiz: &NewQuiz) -> Quiz {
        Quiz {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            questions: quiz.questions.clone(),
            time_limit: quiz.time_limit,
            teacher_id: quiz.teacher_id.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn test_quiz(id: &str, teacher_id: Option<&str>) -> Quiz {
        Quiz {
            id: id.to_string(),
            ..stored_quiz(&NewQuiz::new("Algebra Quiz", sample_questions(), 300).owned_by(teacher_id))
        }
    }

    /// Attempt on `quiz-1`, all created at the same instant.
    pub fn test_attempt(id: &str, name: &str, score: u32, total: u32, time_taken: u32) -> Attempt {
        Attempt {
            id: id.to_string(),
            quiz_id: "quiz-1".to_string(),
            student_name: name.to_string(),
            score,
            total,
            time_taken,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_quiz() {
        let quiz = test_quiz("quiz-1", Some("T1"));
        assert_eq!(quiz.id, "quiz-1");
        assert_eq!(quiz.teacher_id.as_deref(), Some("T1"));
        assert_eq!(quiz.questions.len(), 2);
    }

    #[test]
    fn test_fixtures_test_attempt() {
        let attempt = test_attempt("a", "Ada", 3, 5, 42);
        assert_eq!(attempt.quiz_id, "quiz-1");
        assert_eq!(attempt.score, 3);
    }
}
