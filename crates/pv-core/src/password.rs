//! Password rules for the reset-password form.
//!
//! The checklist is re-evaluated on every keystroke and the same result gates
//! submission. The server remains the authority and may still reject.

use serde::{Deserialize, Serialize};

use crate::{error::CoreError, forms::ResetPasswordRequest};

/// Shortest accepted password.
pub const MIN_LENGTH: usize = 9;
/// Upper bound is part of the policy, not a display limit.
pub const MAX_LENGTH: usize = 12;

/// Characters accepted by the symbol rule.
pub const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Shown when the checklist is incomplete on submit.
pub const REQUIREMENTS_NOT_MET: &str = "Please ensure your password meets all requirements.";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";
pub const INVALID_RESET_LINK: &str = "This password reset link is invalid or has expired.";

/// Result of checking a candidate password against each rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCheck {
    pub length_ok: bool,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_digit: bool,
    pub has_symbol: bool,
}

impl PasswordCheck {
    pub const fn is_valid(&self) -> bool {
        self.length_ok && self.has_upper && self.has_lower && self.has_digit && self.has_symbol
    }

    /// Checklist lines in display order.
    pub const fn requirements(&self) -> [(&'static str, bool); 5] {
        [
            ("9-12 characters", self.length_ok),
            ("One uppercase letter", self.has_upper),
            ("One lowercase letter", self.has_lower),
            ("One number", self.has_digit),
            ("One special character", self.has_symbol),
        ]
    }
}

/// Check `password` against every rule.
///
/// Length is counted in UTF-16 code units, the unit browser forms count, so
/// a character outside the Basic Multilingual Plane (an emoji) counts twice.
/// Both bounds are inclusive:
///
/// ```
/// use pv_core::password::validate;
///
/// assert!(!validate("Abcdef1!").length_ok);
/// assert!(validate("Abcdefg1!").is_valid());
/// ```
pub fn validate(password: &str) -> PasswordCheck {
    let length = password.encode_utf16().count();

    PasswordCheck {
        length_ok: (MIN_LENGTH..=MAX_LENGTH).contains(&length),
        has_upper: password.chars().any(|c| c.is_ascii_uppercase()),
        has_lower: password.chars().any(|c| c.is_ascii_lowercase()),
        has_digit: password.chars().any(|c| c.is_ascii_digit()),
        has_symbol: password.chars().any(|c| SYMBOLS.contains(c)),
    }
}

/// Reset-password form as filled in from the emailed link.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
    /// `token` query parameter of the reset link
    pub token: Option<String>,
}

impl ResetPasswordForm {
    pub fn check(&self) -> PasswordCheck {
        validate(&self.new_password)
    }

    /// Client-side gate before the reset request is sent.
    ///
    /// The checklist is enforced before the confirmation match, mirroring the
    /// order the messages are shown in.
    pub fn validate(&self) -> Result<&str, CoreError> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CoreError::validation(INVALID_RESET_LINK))?;

        if !self.check().is_valid() {
            return Err(CoreError::validation(REQUIREMENTS_NOT_MET));
        }

        if self.new_password != self.confirm_password {
            return Err(CoreError::validation(PASSWORDS_DO_NOT_MATCH));
        }

        Ok(token)
    }

    /// Validate and build the request body.
    pub fn to_request(&self) -> Result<ResetPasswordRequest, CoreError> {
        let token = self.validate()?;

        Ok(ResetPasswordRequest {
            email: self.email.trim().to_string(),
            new_password: self.new_password.clone(),
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        // Each candidate satisfies every other rule
        assert!(!validate("Abcde1!x").length_ok); // 8
        assert!(validate("Abcdef1!x").length_ok); // 9
        assert!(validate("Abcdefgh1!xy").length_ok); // 12
        assert!(!validate("Abcdefghi1!xy").length_ok); // 13
    }

    #[test]
    fn test_known_examples() {
        let short = validate("Abcdef1!");
        assert!(!short.length_ok);
        assert!(short.has_upper && short.has_lower && short.has_digit && short.has_symbol);
        assert!(!short.is_valid());

        let ok = validate("Abcdefg1!");
        assert_eq!(
            ok,
            PasswordCheck {
                length_ok: true,
                has_upper: true,
                has_lower: true,
                has_digit: true,
                has_symbol: true,
            }
        );
        assert!(ok.is_valid());
    }

    #[test]
    fn test_character_classes() {
        assert!(!validate("abcdefg1!").has_upper);
        assert!(!validate("ABCDEFG1!").has_lower);
        assert!(!validate("Abcdefgh!").has_digit);
        assert!(!validate("Abcdefgh1").has_symbol);
        // Symbols outside the fixed set do not count
        assert!(!validate("Abcdefg1-").has_symbol);
        assert!(!validate("Abcdefg1_").has_symbol);
        assert!(validate("Abcdefg1<").has_symbol);
        assert!(validate("Abcdefg1\"").has_symbol);
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // 10 characters, 13 bytes
        assert!(validate("Ébcdéfgé1!").length_ok);
        // 11 characters, 13 UTF-16 units
        assert!(!validate("Abcdefg1!\u{1F600}\u{1F600}").length_ok);
        // 9 characters, 10 UTF-16 units
        assert!(validate("Abcdef1!\u{1F600}").length_ok);
    }

    #[test]
    fn test_empty_password() {
        assert_eq!(validate(""), PasswordCheck::default());
    }

    #[test]
    fn test_requirements_listing() {
        let lines = validate("abc").requirements();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], ("9-12 characters", false));
        assert_eq!(lines[2], ("One lowercase letter", true));
    }

    fn form(new: &str, confirm: &str, token: Option<&str>) -> ResetPasswordForm {
        ResetPasswordForm {
            email: "amy@example.com".to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_reset_form_requires_token() {
        let err = form("Abcdefg1!", "Abcdefg1!", None).validate().unwrap_err();
        assert_eq!(err, CoreError::Validation(INVALID_RESET_LINK.to_string()));
        assert!(form("Abcdefg1!", "Abcdefg1!", Some(" ")).validate().is_err());
    }

    #[test]
    fn test_reset_form_checks_rules_before_match() {
        let err = form("weak", "different", Some("t0k")).validate().unwrap_err();
        assert_eq!(err.to_string(), REQUIREMENTS_NOT_MET);

        let err = form("Abcdefg1!", "Abcdefg1?", Some("t0k")).validate().unwrap_err();
        assert_eq!(err.to_string(), PASSWORDS_DO_NOT_MATCH);

        assert_eq!(form("Abcdefg1!", "Abcdefg1!", Some("t0k")).validate(), Ok("t0k"));
    }
}
