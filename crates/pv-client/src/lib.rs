//! Client side of the admin console: configuration, the typed REST client for
//! the signal-detection backend, and the controllers driving the login,
//! password-reset and user-management flows.

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod submit;
pub mod tracing;

pub use api::ApiClient;
pub use config::{ClientConfig, Environment};
pub use console::AdminConsole;
pub use error::ClientError;
