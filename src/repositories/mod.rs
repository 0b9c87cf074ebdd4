pub mod attempt_repository;
pub mod quiz_repository;
pub mod teacher_repository;

pub use attempt_repository::{AttemptRepository, RestAttemptRepository};
pub use quiz_repository::{QuizRepository, RestQuizRepository};
pub use teacher_repository::{RestTeacherRepository, TeacherRepository};
