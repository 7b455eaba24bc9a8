//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::{ValidateEmail, ValidationError};

/// Maximum length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum length for project and course names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Validates that an email address is syntactically valid.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        let mut err = ValidationError::new("email_too_long");
        err.message = Some("Email must be at most 255 characters".into());
        return Err(err);
    }
    if email.validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_invalid");
        err.message = Some("Invalid email address".into());
        Err(err)
    }
}

/// Normalizes an email address for comparison and storage (trim + lowercase).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks whether two email addresses refer to the same mailbox.
pub fn emails_match(a: &str, b: &str) -> bool {
    normalize_email(a) == normalize_email(b)
}

/// Validates that a paid-period window is ordered (end after begin, when both set).
pub fn validate_period_window(
    begins_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    if let (Some(begin), Some(end)) = (begins_at, ends_at) {
        if end <= begin {
            let mut err = ValidationError::new("period_window");
            err.message = Some("End date must be after begin date".into());
            return Err(err);
        }
    }
    Ok(())
}
