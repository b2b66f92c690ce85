use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::{mongodb::Id, ordering::Order, rules::question::ValidQuestion};

/// One answer option of a question, embedded in its question document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    pub id: Id,
    /// Answer text.
    pub proposition: String,
    pub is_correct: bool,
}

/// Core question data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// The quiz this question belongs to.
    pub quiz_id: Id,
    /// Question text.
    #[serde(rename = "question")]
    pub text: String,
    /// Position of the question within its quiz.
    pub order: Order,
    /// Answer options, in presentation order.
    pub propositions: Vec<Proposition>,
}

impl QuestionCore {
    /// Build a question from validated input, minting fresh proposition IDs.
    pub fn new(quiz_id: Id, order: Order, input: ValidQuestion) -> Self {
        let (text, propositions) = input.into_parts();
        Self {
            quiz_id,
            text,
            order,
            propositions: propositions
                .into_iter()
                .map(|p| Proposition {
                    id: Id::new(),
                    proposition: p.proposition,
                    is_correct: p.is_correct,
                })
                .collect(),
        }
    }

    /// Copy the content of this question into a new question at `order`.
    /// Proposition IDs are regenerated.
    pub fn duplicate_at(&self, order: Order) -> Self {
        Self {
            quiz_id: self.quiz_id,
            text: self.text.clone(),
            order,
            propositions: self
                .propositions
                .iter()
                .map(|p| Proposition {
                    id: Id::new(),
                    proposition: p.proposition.clone(),
                    is_correct: p.is_correct,
                })
                .collect(),
        }
    }
}

/// A question without an ID.
pub type NewQuestion = QuestionCore;

/// A question from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub question: QuestionCore,
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.question
    }
}

impl DerefMut for Question {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.question
    }
}
