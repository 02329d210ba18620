use crate::error::AppError;

/// Trims a required name, rejecting blank input.
pub(crate) fn require_name(name: &str, what: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{what} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trims optional text; blank becomes `None`.
pub(crate) fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Rejects `end` strictly before `start`. Equal values are fine.
pub(crate) fn ensure_ordered<T: PartialOrd>(
    start: &T,
    end: Option<&T>,
    message: &str,
) -> Result<(), AppError> {
    match end {
        Some(end) if end < start => Err(AppError::validation(message)),
        _ => Ok(()),
    }
}
