use thiserror::Error;

/// Failures surfaced to whoever drives a send or fetch.
///
/// `Display` renders exactly the message meant for the user, so callers can
/// show `err.to_string()` inline without further formatting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SenderError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Transport(String),

    #[error("A submission is already in progress")]
    Busy,

    #[error("{0}")]
    Decode(String),
}

impl SenderError {
    pub fn validation(message: impl Into<String>) -> Self {
        SenderError::Validation(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        SenderError::Transport(message.into())
    }
}
