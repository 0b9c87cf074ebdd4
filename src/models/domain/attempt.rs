use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub quiz_id: String,
    pub student_name: String, // Free text, not unique
    pub score: u32,
    pub total: u32,
    pub time_taken: u32, // Seconds
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewAttempt {
    pub quiz_id: String,
    pub student_name: String,
    pub score: u32,
    pub total: u32,
    pub time_taken: u32,
}
