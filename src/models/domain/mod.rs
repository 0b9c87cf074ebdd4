pub mod attempt;
pub mod question;
pub mod quiz;
pub mod teacher;
pub use attempt::{Attempt, NewAttempt};
pub use question::Question;
pub use quiz::{NewQuiz, Quiz, QuizUpdate};
pub use teacher::{Identity, Registration, Session, Teacher};
