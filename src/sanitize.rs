use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search input: {input:?}")]
pub struct InvalidInput {
    pub input: String,
}

/// Accepts ASCII letters, digits, spaces and underscores with at least one
/// alphanumeric character. Valid input is returned unchanged.
pub fn validate(input: &str) -> Result<&str, InvalidInput> {
    let allowed = input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_');
    let has_alnum = input.chars().any(|c| c.is_ascii_alphanumeric());
    if allowed && has_alnum {
        Ok(input)
    } else {
        Err(InvalidInput {
            input: input.to_string(),
        })
    }
}
