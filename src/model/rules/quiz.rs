use super::{char_len, ValidationError};

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
pub const MIN_TIME_TO_ANSWER: i64 = 1;
pub const MAX_TIME_TO_ANSWER: i64 = 60;

/// Quiz creation input that passed [`validate_quiz_create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuiz {
    pub name: String,
    pub description: String,
}

/// Quiz metadata that passed [`validate_metadata_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMetadata {
    pub name: String,
    pub description: String,
    pub time_to_answer: u32,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let length = char_len(name);
    if name.trim().is_empty() {
        Err(ValidationError::EmptyName)
    } else if length > MAX_NAME_LENGTH {
        Err(ValidationError::NameTooLong(length))
    } else {
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let length = char_len(description);
    if length > MAX_DESCRIPTION_LENGTH {
        Err(ValidationError::DescriptionTooLong(length))
    } else {
        Ok(())
    }
}

/// Check the input of a new quiz. A missing description becomes empty.
pub fn validate_quiz_create(
    name: String,
    description: Option<String>,
) -> Result<ValidQuiz, ValidationError> {
    validate_name(&name)?;
    let description = description.unwrap_or_default();
    validate_description(&description)?;
    Ok(ValidQuiz { name, description })
}

/// Check a metadata update.
pub fn validate_metadata_update(
    name: String,
    description: String,
    time_to_answer: i64,
) -> Result<ValidMetadata, ValidationError> {
    validate_name(&name)?;
    validate_description(&description)?;
    if !(MIN_TIME_TO_ANSWER..=MAX_TIME_TO_ANSWER).contains(&time_to_answer) {
        return Err(ValidationError::TimeOutOfRange(time_to_answer));
    }
    Ok(ValidMetadata {
        name,
        description,
        // In range, so the conversion cannot fail.
        time_to_answer: time_to_answer as u32,
    })
}
