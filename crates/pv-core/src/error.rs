use thiserror::Error;

/// Errors raised by the core logic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A form failed client-side validation; the message is shown as-is.
    #[error("{0}")]
    Validation(String),
    /// Text that names none of the values of `kind`, e.g. a role filter.
    #[error("Invalid {kind}: '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}
