//! Admin and authentication forms, and the request bodies they produce.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::{
    error::CoreError,
    user::{Role, UserRecord},
};

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;
/// Minimum for an admin-set password on the edit form.
pub const EDIT_PASSWORD_MIN_LENGTH: usize = 6;

/// Validate an email address the way the create-user and forgot-password
/// forms do.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.trim().is_empty() {
        return Err(CoreError::validation("Please enter an email address"));
    }

    if !email.trim().validate_email() {
        return Err(CoreError::validation("Please enter a valid email address"));
    }

    Ok(())
}

/// Body of `POST /admin/createuser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub user_role: Role,
}

/// "Create user" dialog. The backend picks the username and password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserForm {
    pub email: String,
    pub role: Role,
}

impl CreateUserForm {
    pub fn validate(&self) -> Result<CreateUserRequest, CoreError> {
        validate_email(&self.email)?;

        Ok(CreateUserRequest {
            email: self.email.trim().to_string(),
            user_role: self.role,
        })
    }
}

/// Body of `PUT /admin/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub user_role: Role,
    /// Omitted to keep the current password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Mirror a successful update onto the locally held record.
    pub fn apply_to(&self, record: &mut UserRecord) {
        record.username.clone_from(&self.username);
        record.role = self.user_role;
    }
}

/// "Edit user" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditUserForm {
    pub username: String,
    pub role: Role,
    /// Blank keeps the current password
    pub password: String,
}

impl EditUserForm {
    /// Pre-fill from the selected row; the password always starts blank.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            role: record.role,
            password: String::new(),
        }
    }

    pub fn validate(&self) -> Result<UpdateUserRequest, CoreError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(CoreError::validation("Username is required"));
        }

        let length = username.encode_utf16().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
            return Err(CoreError::validation(format!(
                "Username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            )));
        }

        let password = if self.password.trim().is_empty() {
            None
        } else if self.password.encode_utf16().count() < EDIT_PASSWORD_MIN_LENGTH {
            return Err(CoreError::validation(format!(
                "Password must be at least {EDIT_PASSWORD_MIN_LENGTH} characters"
            )));
        } else {
            Some(self.password.clone())
        };

        Ok(UpdateUserRequest {
            username: username.to_string(),
            user_role: self.role,
            password,
        })
    }
}

/// Body of `POST /login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /forget-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of `POST /reset-password`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
    pub token: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("email", &self.email)
            .field("new_password", &"<redacted>")
            .finish_non_exhaustive()
    }
}
