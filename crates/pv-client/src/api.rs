//! Typed calls against the signal-detection REST backend.

use pv_core::{
    AuthenticatedUser, Role, UserId, UserRecord,
    forms::{
        CreateUserRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
        UpdateUserRequest,
    },
    user::parse_users_response,
};
use reqwest::{Method, RequestBuilder, Response, header};
use serde::{Deserialize, Serialize};

use crate::{config::ClientConfig, error::ClientError};

/// Backend routes
pub mod endpoints {
    use pv_core::UserId;

    pub const LOGIN: &str = "/login";
    pub const FORGOT_PASSWORD: &str = "/forget-password";
    pub const RESET_PASSWORD: &str = "/reset-password";
    pub const USERS: &str = "/admin/users";
    pub const CREATE_USER: &str = "/admin/createuser";

    pub fn user(id: &UserId) -> String {
        format!("{USERS}/{id}")
    }

    pub fn unblock_user(id: &UserId) -> String {
        format!("{USERS}/{id}/unlock")
    }
}

/// Successful `/login` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// User part of a `/login` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub user_role: Role,
}

impl From<LoginResponse> for AuthenticatedUser {
    fn from(response: LoginResponse) -> Self {
        Self {
            id: response.user.id,
            username: response.user.username,
            role: response.user.user_role,
            token: response.token,
        }
    }
}

/// HTTP client for the signal-detection backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client from `config`, picking up `PV_ACCESS_TOKEN` if set.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Same client, sending `token` on admin routes.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "sending backend request");
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(header::ACCEPT, "application/json")
    }

    /// Admin routes need the bearer token; fail before touching the network
    /// when there is none.
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::Unauthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    /// Turn a non-2xx response into [`ClientError::Status`], keeping its text.
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, path, "backend request failed");
        Err(ClientError::Status { status, body })
    }

    /// `POST /login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .request(Method::POST, endpoints::LOGIN)
            .json(&body)
            .send()
            .await?;
        let text = Self::check(response).await?.text().await?;

        Ok(serde_json::from_str(&text)?)
    }

    /// `POST /forget-password`
    pub async fn forgot_password(&self, email: &str) -> Result<(), ClientError> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };

        let response = self
            .request(Method::POST, endpoints::FORGOT_PASSWORD)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;

        Ok(())
    }

    /// `POST /reset-password`
    pub async fn reset_password(&self, body: &ResetPasswordRequest) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, endpoints::RESET_PASSWORD)
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;

        Ok(())
    }

    /// `GET /admin/users`
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        let response = self.authorized(Method::GET, endpoints::USERS)?.send().await?;
        let text = Self::check(response).await?.text().await?;

        let users = parse_users_response(&text)?;
        tracing::debug!(count = users.len(), "fetched users");
        Ok(users)
    }

    /// `POST /admin/createuser`
    pub async fn create_user(&self, body: &CreateUserRequest) -> Result<(), ClientError> {
        let response = self
            .authorized(Method::POST, endpoints::CREATE_USER)?
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;

        tracing::info!(email = %body.email, role = %body.user_role, "user created");
        Ok(())
    }

    /// `PUT /admin/users/{id}`
    pub async fn update_user(
        &self,
        id: &UserId,
        body: &UpdateUserRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .authorized(Method::PUT, &endpoints::user(id))?
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;

        tracing::info!(user_id = %id, "user updated");
        Ok(())
    }

    /// `POST /admin/users/{id}/unlock`
    pub async fn unblock_user(&self, id: &UserId) -> Result<(), ClientError> {
        let response = self
            .authorized(Method::POST, &endpoints::unblock_user(id))?
            .send()
            .await?;
        Self::check(response).await?;

        tracing::info!(user_id = %id, "user unblocked");
        Ok(())
    }

    /// `DELETE /admin/users/{id}`
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ClientError> {
        let response = self
            .authorized(Method::DELETE, &endpoints::user(id))?
            .send()
            .await?;
        Self::check(response).await?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
