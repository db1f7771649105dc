//! Master-password complexity policy.
//!
//! Applied when a vault is created and when the master password is
//! changed.  Opening an existing vault never re-checks the policy.

use thiserror::Error;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Characters that satisfy the "special character" rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{}|;:',.<>?/~`";

/// Human-readable summary of the rules, shown before password prompts.
pub const PASSWORD_REQUIREMENTS: &str = "Password requirements:
  • At least 8 characters
  • At least one uppercase letter
  • At least one digit
  • At least one special character (!@#$%^&* etc.)";

/// The first rule a candidate password breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one digit")]
    MissingDigit,

    #[error("Password must contain at least one special character (!@#$%^&* etc.)")]
    MissingSpecial,
}

/// Check `password` against the policy.
///
/// Rules are checked in a fixed order and only the first violation is
/// reported.
pub fn validate_password(password: &str) -> Result<(), PolicyViolation> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PolicyViolation::TooShort);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(PolicyViolation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(PolicyViolation::MissingSpecial);
    }
    Ok(())
}
