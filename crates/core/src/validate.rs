//! Input validation helpers shared by API handlers.
//!
//! Validators return `Result<(), String>` so callers can map the message
//! into their own error type (the api crate wraps them in a 400 response).

use crate::team::is_team_member;

/// Maximum length for free-text content fields (workflow items, notes).
pub const MAX_CONTENT_LEN: usize = 2000;

/// Validate free-text content: non-empty after trimming, bounded length.
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("content must not be empty".to_string());
    }
    if content.len() > MAX_CONTENT_LEN {
        return Err(format!("content must be at most {MAX_CONTENT_LEN} bytes"));
    }
    Ok(())
}

/// Validate a person key against the fixed team registry.
pub fn validate_person(person: &str) -> Result<(), String> {
    if is_team_member(person) {
        Ok(())
    } else {
        Err(format!("unknown person '{person}'"))
    }
}

/// Validate an item quantity (orders, planning rows).
pub fn validate_quantity(quantity: i32) -> Result<(), String> {
    if quantity < 1 {
        return Err("quantity must be at least 1".to_string());
    }
    Ok(())
}

/// Clamp a caller-supplied page size into `1..=200` (default 50).
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

/// Clamp a caller-supplied offset to be non-negative (default 0).
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_must_not_be_blank() {
        assert!(validate_content("Buy thread").is_ok());
        assert!(validate_content("").is_err());
        assert!(validate_content("   ").is_err());
    }

    #[test]
    fn content_length_is_bounded() {
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        assert!(validate_content(&long).is_err());
        let max = "x".repeat(MAX_CONTENT_LEN);
        assert!(validate_content(&max).is_ok());
    }

    #[test]
    fn person_keys_are_checked() {
        assert!(validate_person("melina").is_ok());
        assert!(validate_person("nobody").is_err());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None), 50);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), 200);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-5)), 0);
    }
}
