//! Login and password-recovery flows.
//!
//! Each flow reports its outcome as the flash message the form displays.
//! Failures are logged with their cause and shown to the user generically.

use pv_core::{
    AppContext, AuthenticatedUser,
    display::{self, FlashMessage},
    forms::validate_email,
    password::ResetPasswordForm,
};

use crate::api::ApiClient;

/// Sign in and record the user in `ctx`.
pub async fn login(
    client: &ApiClient,
    ctx: &mut AppContext,
    email: &str,
    password: &str,
) -> FlashMessage {
    match client.login(email, password).await {
        Ok(response) => {
            let user = AuthenticatedUser::from(response);
            tracing::info!(username = %user.username, role = %user.role, "signed in");
            ctx.login(user);
            FlashMessage::success(display::LOGIN_SUCCEEDED)
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            FlashMessage::danger(display::LOGIN_FAILED)
        }
    }
}

/// Ask the backend to email reset instructions.
pub async fn request_password_reset(client: &ApiClient, email: &str) -> FlashMessage {
    if let Err(e) = validate_email(email) {
        return FlashMessage::danger(e.to_string());
    }

    match client.forgot_password(email.trim()).await {
        Ok(()) => FlashMessage::success(display::RESET_EMAIL_SENT),
        Err(e) => {
            tracing::warn!("Password reset request failed: {e}");
            FlashMessage::danger(display::RESET_EMAIL_FAILED)
        }
    }
}

/// Submit a new password. Nothing is sent unless the form passes the
/// client-side checks.
pub async fn reset_password(client: &ApiClient, form: &ResetPasswordForm) -> FlashMessage {
    let request = match form.to_request() {
        Ok(request) => request,
        Err(e) => return FlashMessage::danger(e.to_string()),
    };

    match client.reset_password(&request).await {
        Ok(()) => FlashMessage::success(display::PASSWORD_RESET_SUCCEEDED),
        Err(e) => {
            tracing::warn!("Password reset failed: {e}");
            FlashMessage::danger(display::PASSWORD_RESET_FAILED)
        }
    }
}
