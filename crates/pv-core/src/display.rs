//! User-facing text: flash messages and timestamp formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timestamp::parse_timestamp;

pub const USER_CREATED: &str = "User created successfully!";
pub const USER_UPDATED: &str = "User updated successfully!";
pub const USER_UNBLOCKED: &str = "User unblocked successfully!";
pub const USER_DELETED: &str = "User deleted successfully!";

pub const FETCH_USERS_FAILED: &str = "Failed to fetch users";
pub const UPDATE_USER_FAILED: &str = "Failed to update user. Please try again.";
pub const UNBLOCK_USER_FAILED: &str = "Failed to unblock user. Please try again.";
pub const CREATE_USER_FAILED: &str = "Failed to create user. Please try again.";
pub const DELETE_USER_FAILED: &str = "Failed to delete user. Please try again.";
pub const ACCESS_DENIED: &str =
    "You do not have access to this feature. Contact your administrator for access.";

pub const LOGIN_SUCCEEDED: &str = "Login successful!";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const RESET_EMAIL_SENT: &str =
    "Password reset instructions have been sent to your email. Please check your inbox.";
pub const RESET_EMAIL_FAILED: &str = "Failed to process your request. Please try again later.";
pub const PASSWORD_RESET_SUCCEEDED: &str =
    "Password has been successfully reset. You can now login with your new password.";
pub const PASSWORD_RESET_FAILED: &str =
    "Failed to reset password. Please try again or request a new reset link.";

/// Shown for a timestamp the backend never set.
pub const NEVER: &str = "Never";
pub const INVALID_DATE: &str = "Invalid Date";

/// How a flash message is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
}

/// Outcome banner shown above a form or the user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Danger,
            message: message.into(),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.category, FlashCategory::Danger)
    }
}

impl fmt::Display for FlashMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Format a backend timestamp for the table, e.g. `Jan 5, 2024, 03:04 PM`
/// (UTC).
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return NEVER.to_string();
    };

    match parse_timestamp(raw) {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => INVALID_DATE.to_string(),
    }
}
