use serde::{Deserialize, Serialize};

use super::ApiId;
use crate::model::{
    db::{Proposition, Question},
    ordering::Order,
    rules::{
        question::{validate_question_input, PropositionInput, ValidQuestion},
        ValidationError,
    },
};

/// A question as submitted for creation or replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    /// Question text.
    pub question: String,
    /// Answer options, in presentation order.
    pub propositions: Vec<PropositionInput>,
}

impl QuestionSpec {
    pub fn validate(self) -> Result<ValidQuestion, ValidationError> {
        validate_question_input(self.question, self.propositions)
    }
}

/// The requested position of one question in a bulk reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    pub id: ApiId,
    /// Signed so that negative orders surface as an invalid permutation.
    pub order: i64,
}

/// An API-friendly question description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDescription {
    pub id: ApiId,
    pub question: String,
    pub order: Order,
    pub propositions: Vec<PropositionDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropositionDescription {
    pub id: ApiId,
    pub proposition: String,
    pub is_correct: bool,
}

impl From<Proposition> for PropositionDescription {
    fn from(proposition: Proposition) -> Self {
        Self {
            id: proposition.id.into(),
            proposition: proposition.proposition,
            is_correct: proposition.is_correct,
        }
    }
}

impl From<Question> for QuestionDescription {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.into(),
            question: question.question.text,
            order: question.question.order,
            propositions: question
                .question
                .propositions
                .into_iter()
                .map(PropositionDescription::from)
                .collect(),
        }
    }
}
