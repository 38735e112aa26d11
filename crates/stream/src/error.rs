use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreamError>;

/// Failures that end a session.
///
/// Malformed frames and cancellation are not represented here: the former are
/// skipped, the latter ends the sequence cleanly.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The byte source failed before a terminal event arrived.
    #[error("Stream transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The upstream reported `status: error`; carries its message verbatim.
    #[error("{message}")]
    Upstream { message: String },

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl StreamError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// True for the upstream-reported failure, as opposed to a broken transport.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}
