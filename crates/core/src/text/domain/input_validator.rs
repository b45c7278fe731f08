use thiserror::Error;

use crate::shared::constants::{MAX_INPUT_CHARS, MIN_INPUT_CHARS};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Text cannot be empty")]
    Empty,
    #[error("Text is too short (minimum {MIN_INPUT_CHARS} characters)")]
    TooShort,
    #[error("Text is too long (maximum {MAX_INPUT_CHARS} characters)")]
    TooLong,
}

/// Rejects text that cannot produce a meaningful video.
pub fn validate_text_input(text: &str) -> Result<(), InputError> {
    let len = text.chars().count();
    if text.trim().is_empty() {
        return Err(InputError::Empty);
    }
    if len < MIN_INPUT_CHARS {
        return Err(InputError::TooShort);
    }
    if len > MAX_INPUT_CHARS {
        return Err(InputError::TooLong);
    }
    Ok(())
}
