//! Input validation for quizzes and questions.
//!
//! Every check here runs before any mutation reaches the store.

use thiserror::Error;

pub mod question;
pub mod quiz;
pub mod waitlist;

/// A field-level input failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Question text must not be empty")]
    EmptyQuestionText,
    #[error(
        "A question needs between {} and {} propositions, got {0}",
        question::MIN_PROPOSITIONS,
        question::MAX_PROPOSITIONS
    )]
    PropositionCountOutOfRange(usize),
    #[error(
        "Proposition {index} must be between 1 and {} characters, got {length}",
        question::MAX_PROPOSITION_LENGTH
    )]
    PropositionTextOutOfRange { index: usize, length: usize },
    #[error("At least one proposition must be marked correct")]
    NoCorrectAnswer,
    #[error("Quiz name must not be empty")]
    EmptyName,
    #[error("Quiz name must be at most {} characters, got {0}", quiz::MAX_NAME_LENGTH)]
    NameTooLong(usize),
    #[error(
        "Quiz description must be at most {} characters, got {0}",
        quiz::MAX_DESCRIPTION_LENGTH
    )]
    DescriptionTooLong(usize),
    #[error(
        "Time to answer must be between {} and {} seconds, got {0}",
        quiz::MIN_TIME_TO_ANSWER,
        quiz::MAX_TIME_TO_ANSWER
    )]
    TimeOutOfRange(i64),
    #[error("Not a valid email address: {0:?}")]
    InvalidEmail(String),
}

/// Length in characters, as users count them, rather than in bytes.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
