//! Input validation helpers
//!
//! Centralized text length constants and validation functions applied at the
//! handler boundary, before any domain call.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, variant labels
pub const MAX_NAME_LEN: usize = 200;

/// Adjustment reasons, notes, history descriptions
pub const MAX_REASON_LEN: usize = 500;

/// Short identifiers: SKU, size, color
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_empty() {
        assert!(validate_required_text("", "reason", MAX_REASON_LEN).is_err());
        assert!(validate_required_text("   ", "reason", MAX_REASON_LEN).is_err());
        assert!(validate_required_text("sold offline", "reason", MAX_REASON_LEN).is_ok());
    }

    #[test]
    fn test_required_text_rejects_too_long() {
        let long = "x".repeat(MAX_REASON_LEN + 1);
        assert!(validate_required_text(&long, "reason", MAX_REASON_LEN).is_err());
        let exact = "x".repeat(MAX_REASON_LEN);
        assert!(validate_required_text(&exact, "reason", MAX_REASON_LEN).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "sku", MAX_SHORT_TEXT_LEN).is_ok());
        let long = Some("x".repeat(MAX_SHORT_TEXT_LEN + 1));
        assert!(validate_optional_text(&long, "sku", MAX_SHORT_TEXT_LEN).is_err());
    }
}
