//! User-management console.
//!
//! Holds the user list fetched from the backend together with the table state
//! and the latest success/error message. Operations take `&self` so several
//! UI handlers can share one console; mutating operations go through a
//! [`SubmissionGuard`] and a second click while one is in flight does nothing.

use std::sync::{Mutex, MutexGuard, PoisonError};

use pv_core::{
    AppContext, Page, UserId, UserRecord, UserTableView,
    display,
    forms::{CreateUserForm, EditUserForm},
};

use crate::{api::ApiClient, error::ClientError, submit::SubmissionGuard};

#[derive(Debug, Default, Clone)]
struct ConsoleState {
    users: Vec<UserRecord>,
    view: UserTableView,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
}

/// State and actions of the user-management screen.
#[derive(Debug)]
pub struct AdminConsole {
    client: ApiClient,
    state: Mutex<ConsoleState>,
    submission: SubmissionGuard,
}

impl AdminConsole {
    /// Open the console for the signed-in user. Only admins get in.
    pub fn new(ctx: &AppContext, client: ApiClient) -> Result<Self, ClientError> {
        if !ctx.is_admin() {
            return Err(ClientError::AccessDenied);
        }
        let token = ctx.token().ok_or(ClientError::Unauthenticated)?;

        Ok(Self {
            client: client.with_token(token),
            state: Mutex::new(ConsoleState::default()),
            submission: SubmissionGuard::new(),
        })
    }

    fn state(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.state().users.clone()
    }

    pub fn find_user(&self, id: &UserId) -> Option<UserRecord> {
        self.state().users.iter().find(|u| &u.id == id).cloned()
    }

    pub fn view(&self) -> UserTableView {
        self.state().view.clone()
    }

    /// Change filters, sorting or the page.
    pub fn update_view<F>(&self, f: F)
    where
        F: FnOnce(&mut UserTableView),
    {
        f(&mut self.state().view);
    }

    /// Current table page: filtered, sorted, paginated.
    pub fn page(&self) -> Page<UserRecord> {
        let state = self.state();
        state.view.render(&state.users)
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_in_flight()
    }

    /// Error banner of the last operation, if it failed.
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Success banner of the last operation.
    pub fn success(&self) -> Option<String> {
        self.state().success.clone()
    }

    pub fn clear_messages(&self) {
        let mut state = self.state();
        state.error = None;
        state.success = None;
    }

    fn begin(&self) {
        let mut state = self.state();
        state.loading = true;
        state.error = None;
        state.success = None;
    }

    fn finish(&self, outcome: Result<&str, String>) -> bool {
        let mut state = self.state();
        state.loading = false;
        match outcome {
            Ok(message) => {
                state.success = Some(message.to_string());
                true
            }
            Err(message) => {
                state.error = Some(message);
                false
            }
        }
    }

    /// Fetch the user list.
    ///
    /// A non-empty result replaces the held list; an empty one leaves it
    /// untouched. On failure the error message is set and an empty list is
    /// returned.
    pub async fn load_users(&self) -> Vec<UserRecord> {
        self.begin();
        let users = self.fetch().await;
        self.state().loading = false;
        users
    }

    /// Reload after a change without clearing the change's message.
    async fn fetch(&self) -> Vec<UserRecord> {
        match self.client.list_users().await {
            Ok(users) => {
                if !users.is_empty() {
                    self.state().users.clone_from(&users);
                }
                users
            }
            Err(e) => {
                tracing::error!("Error fetching users: {e}");
                self.state().error = Some(display::FETCH_USERS_FAILED.to_string());
                Vec::new()
            }
        }
    }

    /// Save the edit form; on success the local row is patched in place.
    pub async fn update_user(&self, id: &UserId, form: &EditUserForm) -> bool {
        let Some(_submission) = self.submission.try_begin() else {
            tracing::debug!(user_id = %id, "update already in flight, ignoring");
            return false;
        };
        self.begin();

        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => return self.finish(Err(e.to_string())),
        };

        match self.client.update_user(id, &request).await {
            Ok(()) => {
                if let Some(user) = self.state().users.iter_mut().find(|u| &u.id == id) {
                    request.apply_to(user);
                }
                self.finish(Ok(display::USER_UPDATED))
            }
            Err(e) => {
                tracing::error!(user_id = %id, "Error updating user: {e}");
                self.finish(Err(display::UPDATE_USER_FAILED.to_string()))
            }
        }
    }

    /// Clear a user's failed login attempts, then reload the list.
    pub async fn unblock_user(&self, id: &UserId) -> bool {
        let Some(_submission) = self.submission.try_begin() else {
            tracing::debug!(user_id = %id, "unblock already in flight, ignoring");
            return false;
        };
        self.begin();

        match self.client.unblock_user(id).await {
            Ok(()) => {
                let ok = self.finish(Ok(display::USER_UNBLOCKED));
                self.fetch().await;
                ok
            }
            Err(e) => {
                tracing::error!(user_id = %id, "Error unblocking user: {e}");
                self.finish(Err(display::UNBLOCK_USER_FAILED.to_string()))
            }
        }
    }

    /// Create a user from the form, then reload the list.
    ///
    /// The backend's own explanation is shown when it gives one.
    pub async fn create_user(&self, form: &CreateUserForm) -> bool {
        let Some(_submission) = self.submission.try_begin() else {
            tracing::debug!("create already in flight, ignoring");
            return false;
        };
        self.begin();

        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => return self.finish(Err(e.to_string())),
        };

        match self.client.create_user(&request).await {
            Ok(()) => {
                let ok = self.finish(Ok(display::USER_CREATED));
                self.fetch().await;
                ok
            }
            Err(e) => {
                tracing::error!("Error creating user: {e}");
                let message = e.body().unwrap_or(display::CREATE_USER_FAILED).to_string();
                self.finish(Err(message))
            }
        }
    }

    /// Delete a user; on success the row is dropped locally.
    pub async fn delete_user(&self, id: &UserId) -> bool {
        let Some(_submission) = self.submission.try_begin() else {
            tracing::debug!(user_id = %id, "delete already in flight, ignoring");
            return false;
        };
        self.begin();

        match self.client.delete_user(id).await {
            Ok(()) => {
                self.state().users.retain(|u| &u.id != id);
                self.finish(Ok(display::USER_DELETED))
            }
            Err(e) => {
                tracing::error!(user_id = %id, "Error deleting user: {e}");
                self.finish(Err(display::DELETE_USER_FAILED.to_string()))
            }
        }
    }
}
