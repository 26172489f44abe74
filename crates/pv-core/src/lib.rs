//! Core logic for the pharmacovigilance admin console.
//!
//! Everything in this crate is synchronous and free of I/O: the user model
//! returned by the backend, the client-side table helpers (filter, sort,
//! paginate), the password checklist, the unsaved-changes navigation guard,
//! and the explicit application context shared by the front ends.

pub mod context;
pub mod display;
pub mod error;
pub mod forms;
pub mod navigation;
pub mod password;
pub mod table;
pub mod timestamp;
/// User records as sent by the backend.
pub mod user;

pub use context::{AppContext, AuthenticatedUser, Theme};
pub use error::CoreError;
pub use navigation::{NavigationDecision, NavigationGuard, NavigationTarget};
pub use password::PasswordCheck;
pub use table::{FilterSpec, Page, SortDirection, SortField, SortSpec, UserTableView};
pub use user::{Role, UserId, UserRecord, UserStatus};
