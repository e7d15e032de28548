// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

pub mod event;
pub mod interest;
pub mod message;
pub mod profile;

use crate::error::{AppError, AppResult};

/// Validate a required text field: non-empty after trimming. Returns the
/// trimmed value so callers never persist surrounding whitespace.
pub fn required_trimmed(label: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_is_trimmed() {
        assert_eq!(required_trimmed("Full name", "  Ada  ").unwrap(), "Ada");
    }

    #[test]
    fn whitespace_only_is_rejected() {
        let err = required_trimmed("Full name", "   ").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Full name is required"));
    }
}
