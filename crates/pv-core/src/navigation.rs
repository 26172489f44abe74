//! Unsaved-changes guard for navigation.
//!
//! In-app route changes, history back/forward and closing the tab all arrive
//! here as a [`NavigationTarget`]. Whether there is unsaved data is supplied by
//! the caller with each request, either as a value or a callback; the guard
//! never looks it up itself.

use std::fmt;

/// Where a navigation request wants to go.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NavigationTarget {
    /// In-app route change, e.g. a menu link.
    Route(String),
    /// History traversal; `-1` is "back".
    History(i32),
    /// Closing the tab or leaving through the browser chrome.
    Unload,
}

impl NavigationTarget {
    pub fn route(path: impl Into<String>) -> Self {
        Self::Route(path.into())
    }

    pub const fn back() -> Self {
        Self::History(-1)
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(path) => f.write_str(path),
            Self::History(delta) => write!(f, "history({delta})"),
            Self::Unload => f.write_str("unload"),
        }
    }
}

/// State of a [`NavigationGuard`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GuardState {
    #[default]
    Idle,
    /// Waiting for the user to confirm or cancel leaving.
    PendingConfirmation(NavigationTarget),
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum NavigationDecision {
    /// Nothing to lose; perform the navigation now.
    Proceed(NavigationTarget),
    /// Held until [`NavigationGuard::confirm`] or [`NavigationGuard::cancel`].
    Blocked,
}

/// Whether a request made with this predicate result has to wait for
/// confirmation.
pub const fn should_block(has_unsaved_data: bool) -> bool {
    has_unsaved_data
}

/// Holds a navigation back until the user confirms leaving unsaved data.
#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    state: GuardState,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &GuardState {
        &self.state
    }

    /// Drives the confirmation dialog.
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, GuardState::PendingConfirmation(_))
    }

    pub const fn pending(&self) -> Option<&NavigationTarget> {
        match &self.state {
            GuardState::PendingConfirmation(target) => Some(target),
            GuardState::Idle => None,
        }
    }

    /// Request a navigation.
    ///
    /// With no unsaved data the target is handed straight back and any held
    /// target is dropped, so the guard is idle afterwards. Otherwise the
    /// target is held; a request made while one is already held replaces it.
    pub fn request(
        &mut self,
        target: NavigationTarget,
        has_unsaved_data: bool,
    ) -> NavigationDecision {
        if !should_block(has_unsaved_data) {
            self.take_pending();
            return NavigationDecision::Proceed(target);
        }

        self.state = GuardState::PendingConfirmation(target);
        NavigationDecision::Blocked
    }

    /// Like [`request`](Self::request) with the predicate evaluated lazily,
    /// once, at request time.
    pub fn request_with<F>(
        &mut self,
        target: NavigationTarget,
        has_unsaved_data: F,
    ) -> NavigationDecision
    where
        F: FnOnce() -> bool,
    {
        self.request(target, has_unsaved_data())
    }

    /// The user chose to leave: returns the held target exactly once.
    pub fn confirm(&mut self) -> Option<NavigationTarget> {
        self.take_pending()
    }

    /// The user chose to stay: the held target is dropped and returned for
    /// logging only.
    pub fn cancel(&mut self) -> Option<NavigationTarget> {
        self.take_pending()
    }

    fn take_pending(&mut self) -> Option<NavigationTarget> {
        match std::mem::take(&mut self.state) {
            GuardState::PendingConfirmation(target) => Some(target),
            GuardState::Idle => None,
        }
    }
}
