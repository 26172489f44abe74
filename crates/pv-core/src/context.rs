//! Application-wide state shared by every screen: the colour theme and the
//! signed-in user. Passed explicitly to whatever needs it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::CoreError,
    user::{Role, UserId},
};

/// Colour theme of the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(CoreError::unknown("theme", s)),
        }
    }
}

/// The signed-in user, as established by a successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    /// Bearer token sent with admin requests
    pub token: String,
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Theme and session shared by every screen.
///
/// Replaces ambient global state: each screen receives the context it reads
/// or updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppContext {
    theme: Theme,
    user: Option<AuthenticatedUser>,
}

impl AppContext {
    /// Signed-out context with the given theme.
    pub fn new(theme: Theme) -> Self {
        Self { theme, user: None }
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Only admins may open the user-management console.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.token.as_str())
    }

    pub const fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flip between light and dark, returning the new theme.
    pub const fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Record a successful login, replacing any previous session.
    pub fn login(&mut self, user: AuthenticatedUser) {
        self.user = Some(user);
    }

    /// Forget the signed-in user; the theme survives.
    pub fn logout(&mut self) -> Option<AuthenticatedUser> {
        self.user.take()
    }
}
