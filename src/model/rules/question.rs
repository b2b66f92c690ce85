use serde::{Deserialize, Serialize};

use super::{char_len, ValidationError};

pub const MIN_PROPOSITIONS: usize = 1;
pub const MAX_PROPOSITIONS: usize = 4;
pub const MAX_PROPOSITION_LENGTH: usize = 120;

/// A proposition as submitted by a quiz editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropositionInput {
    pub proposition: String,
    pub is_correct: bool,
}

/// Question input that passed [`validate_question_input`].
///
/// The only way to obtain one is through validation, so anything holding a
/// `ValidQuestion` can be persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuestion {
    text: String,
    propositions: Vec<PropositionInput>,
}

impl ValidQuestion {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn propositions(&self) -> &[PropositionInput] {
        &self.propositions
    }

    pub fn into_parts(self) -> (String, Vec<PropositionInput>) {
        (self.text, self.propositions)
    }
}

/// Check the shape of a question and its propositions.
///
/// Propositions keep their submission order, which becomes their
/// presentation order.
pub fn validate_question_input(
    question: String,
    propositions: Vec<PropositionInput>,
) -> Result<ValidQuestion, ValidationError> {
    if question.trim().is_empty() {
        return Err(ValidationError::EmptyQuestionText);
    }

    if !(MIN_PROPOSITIONS..=MAX_PROPOSITIONS).contains(&propositions.len()) {
        return Err(ValidationError::PropositionCountOutOfRange(
            propositions.len(),
        ));
    }

    if let Some((index, length)) = propositions
        .iter()
        .map(|p| char_len(&p.proposition))
        .enumerate()
        .find(|&(_, length)| length == 0 || length > MAX_PROPOSITION_LENGTH)
    {
        return Err(ValidationError::PropositionTextOutOfRange { index, length });
    }

    if !propositions.iter().any(|p| p.is_correct) {
        return Err(ValidationError::NoCorrectAnswer);
    }

    Ok(ValidQuestion {
        text: question,
        propositions,
    })
}
