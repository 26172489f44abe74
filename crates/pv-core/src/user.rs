use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{error::CoreError, timestamp};

/// Backend-assigned user identifier.
///
/// The listing endpoint has shipped it both as a JSON number and as a string,
/// so both are accepted and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        value
            .parse::<i64>()
            .map_or_else(|_| Self::Text(value.to_string()), Self::Number)
    }
}

/// Account role
///
/// Decoding is lenient: case is ignored and any value other than `admin`
/// reads as [`Role::Normal`], so an unexpected role never grants admin rights
/// and never fails a whole listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May open the user-management console.
    Admin,
    #[default]
    Normal,
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

impl Role {
    /// Wire representation, also used for text ordering.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "normal" => Ok(Self::Normal),
            _ => Err(CoreError::unknown("role", s)),
        }
    }
}

/// Display status derived from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
    /// Reserved by the backend's vocabulary. Nothing derives it.
    Pending,
}

impl UserStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as returned by `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier, immutable
    #[serde(rename = "uniqueid")]
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "user_role", default, deserialize_with = "null_as_default")]
    pub role: Role,
    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last successful login, if any
    #[serde(rename = "lastlogged_in", default)]
    pub last_logged_in: Option<String>,
    /// Failed login attempts; any positive value means the account is blocked
    #[serde(default, deserialize_with = "null_as_default")]
    pub login_attempts: u32,
}

impl UserRecord {
    pub const fn is_blocked(&self) -> bool {
        self.login_attempts > 0
    }

    /// Status is a pure function of `login_attempts`.
    pub const fn status(&self) -> UserStatus {
        if self.is_blocked() {
            UserStatus::Blocked
        } else {
            UserStatus::Active
        }
    }

    pub fn created_instant(&self) -> DateTime<Utc> {
        timestamp::sort_instant(self.created_at.as_deref())
    }

    pub fn last_logged_in_instant(&self) -> DateTime<Utc> {
        timestamp::sort_instant(self.last_logged_in.as_deref())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Extract the user list from a `GET /admin/users` body.
///
/// The backend returns either a bare array, `{ "users": [...] }` or
/// `{ "data": [...] }`. Any other well-formed JSON yields an empty list.
/// Records that cannot be decoded (no `uniqueid`, wrong types) are logged and
/// skipped; only a body that is not JSON at all is an error.
pub fn parse_users_response(body: &str) -> Result<Vec<UserRecord>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            match ["users", "data"]
                .iter()
                .find_map(|key| map.remove(*key).filter(Value::is_array))
            {
                Some(Value::Array(items)) => items,
                _ => return Ok(Vec::new()),
            }
        }
        _ => return Ok(Vec::new()),
    };

    let users = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed user record");
                None
            }
        })
        .collect();

    Ok(users)
}
