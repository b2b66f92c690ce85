use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{question::QuestionDescription, ApiId};
use crate::model::{
    db::{Question, Quiz},
    rules::{
        quiz::{validate_metadata_update, validate_quiz_create, ValidMetadata, ValidQuiz},
        ValidationError,
    },
};

/// A new quiz as submitted by its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl QuizSpec {
    pub fn validate(self) -> Result<ValidQuiz, ValidationError> {
        validate_quiz_create(self.name, self.description)
    }
}

/// Replacement metadata for an existing quiz. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataUpdate {
    pub name: String,
    pub description: String,
    /// Seconds per question. Signed so that out-of-range values are reported
    /// as a validation failure.
    pub time_to_answer: i64,
}

impl MetadataUpdate {
    pub fn validate(self) -> Result<ValidMetadata, ValidationError> {
        validate_metadata_update(self.name, self.description, self.time_to_answer)
    }
}

/// A full quiz, with its questions in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDescription {
    pub id: ApiId,
    pub name: String,
    pub description: String,
    pub time_to_answer: u32,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub questions: Vec<QuestionDescription>,
}

impl QuizDescription {
    /// Describe a quiz. `questions` must already be sorted by order.
    pub fn new(quiz: Quiz, questions: Vec<Question>) -> Self {
        Self {
            id: quiz.id.into(),
            name: quiz.quiz.name,
            description: quiz.quiz.description,
            time_to_answer: quiz.quiz.time_to_answer,
            creator: quiz.quiz.creator,
            created_at: quiz.quiz.created_at,
            updated_at: quiz.quiz.updated_at,
            questions: questions.into_iter().map(QuestionDescription::from).collect(),
        }
    }
}

/// A quiz in a listing: its metadata and the IDs of its questions in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: ApiId,
    pub name: String,
    pub description: String,
    pub time_to_answer: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub question_ids: Vec<ApiId>,
}

impl QuizSummary {
    pub fn new(quiz: Quiz, questions: &[Question]) -> Self {
        Self {
            id: quiz.id.into(),
            name: quiz.quiz.name,
            description: quiz.quiz.description,
            time_to_answer: quiz.quiz.time_to_answer,
            created_at: quiz.quiz.created_at,
            updated_at: quiz.quiz.updated_at,
            question_ids: questions.iter().map(|q| q.id.into()).collect(),
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl QuizSpec {
        pub fn example() -> Self {
            Self {
                name: "Solar system".to_string(),
                description: Some("Planets and moons".to_string()),
            }
        }

        pub fn named(name: &str) -> Self {
            Self {
                name: name.to_string(),
                description: None,
            }
        }
    }

    impl MetadataUpdate {
        pub fn example() -> Self {
            Self {
                name: "Outer planets".to_string(),
                description: "Gas and ice giants".to_string(),
                time_to_answer: 45,
            }
        }
    }
}
