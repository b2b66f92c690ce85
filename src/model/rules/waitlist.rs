use super::ValidationError;

/// A loose email check: one `@` with something on both sides and a dot in
/// the domain. Returns the trimmed, lowercased address.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email.to_lowercase())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}
