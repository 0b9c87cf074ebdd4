use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One multiple-choice question as stored in a quiz's `questions` column.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[validate(schema(function = "correct_index_in_range"))]
pub struct Question {
    #[serde(rename = "question")]
    #[validate(
        length(min = 1, message = "Question prompt cannot be empty"),
        custom(function = "not_blank")
    )]
    pub prompt: String,
    #[validate(length(min = 1, message = "A question needs at least one option"))]
    pub options: Vec<String>,
    pub correct: usize, // index into options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn new(prompt: &str, options: &[&str], correct: usize) -> Self {
        Question {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = Some(explanation.to_string());
        self
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }
}

/// Rejects text made only of whitespace.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn correct_index_in_range(question: &Question) -> Result<(), ValidationError> {
    if question.correct_option().is_none() {
        let mut err = ValidationError::new("correct_out_of_range");
        err.message = Some("The correct answer must be one of the options".into());
        return Err(err);
    }
    Ok(())
}
