use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{db::now, mongodb::Id};

/// Seconds given to players for each question of a freshly created quiz.
pub const DEFAULT_TIME_TO_ANSWER: u32 = 30;

/// Core quiz data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCore {
    /// Quiz name, unique per creator.
    pub name: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Seconds allowed to answer each question.
    pub time_to_answer: u32,
    /// Opaque identifier of the owner.
    pub creator: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl QuizCore {
    /// Create a new, empty quiz owned by `creator`.
    pub fn new(name: String, description: String, creator: String) -> Self {
        let timestamp = now();
        Self {
            name,
            description,
            time_to_answer: DEFAULT_TIME_TO_ANSWER,
            creator,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Is this quiz owned by the given caller?
    pub fn is_owned_by(&self, caller: &str) -> bool {
        self.creator == caller
    }
}

/// A quiz without an ID.
pub type NewQuiz = QuizCore;

/// A quiz from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub quiz: QuizCore,
}

impl Deref for Quiz {
    type Target = QuizCore;

    fn deref(&self) -> &Self::Target {
        &self.quiz
    }
}

impl DerefMut for Quiz {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.quiz
    }
}
