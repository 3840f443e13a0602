//! Shared error type across chansub crates.

use thiserror::Error;

/// Stable error kinds (used in logs and metric labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inbound frame is not a structured channel message.
    DecodeMismatch,
    /// Underlying connection reported an error.
    Transport,
    /// Connection closed (peer or local).
    TransportClosed,
    /// Operation attempted in a connection state that forbids it.
    InvalidState,
    /// Configuration rejected.
    BadConfig,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in log fields and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::DecodeMismatch => "DECODE_MISMATCH",
            ErrorKind::Transport => "TRANSPORT_ERROR",
            ErrorKind::TransportClosed => "TRANSPORT_CLOSED",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ChanSubError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum ChanSubError {
    #[error("decode mismatch: {0}")]
    DecodeMismatch(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("transport closed")]
    TransportClosed,
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ChanSubError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChanSubError::DecodeMismatch(_) => ErrorKind::DecodeMismatch,
            ChanSubError::Transport(_) => ErrorKind::Transport,
            ChanSubError::TransportClosed => ErrorKind::TransportClosed,
            ChanSubError::InvalidState(_) => ErrorKind::InvalidState,
            ChanSubError::BadConfig(_) => ErrorKind::BadConfig,
            ChanSubError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the client may keep running after observing this error.
    ///
    /// `InvalidState` is a logic defect and `BadConfig`/`Internal` stop startup.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DecodeMismatch | ErrorKind::Transport | ErrorKind::TransportClosed
        )
    }
}
