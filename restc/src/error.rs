//! Client-side error types.
//!
//! This module provides [`ClientError`], the single error type returned by
//! every stage of the request pipeline: configuration, request building,
//! transport, response status, envelope handling and decoding.

use http::StatusCode;

/// Error variants produced while building, executing or decoding a request.
///
/// Variants that carry a server-provided message (`Status`, `Envelope`)
/// display that message verbatim so callers can surface it unchanged.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ClientError {
    /// The connection settings are incomplete or invalid (missing scheme or
    /// host, unparsable target, invalid default header).
    #[error("{0}")]
    Config(String),

    /// The request could not be built (body serialization failed, invalid
    /// method or URL).
    #[error("encode error: {0}")]
    Encode(String),

    /// Transport-level failure (connection refused, reset, IO error).
    ///
    /// This is the only variant the executor retries.
    #[error("transport error: {0}")]
    Transport(String),

    /// The configured call deadline expired before the call completed.
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(std::time::Duration),

    /// Protocol-level failure: empty error body, unhealthy status on a
    /// streamed call, rejected WebSocket handshake.
    #[error("{0}")]
    Protocol(String),

    /// The server answered with a non-200 HTTP status.
    ///
    /// `message` is the envelope message (when envelope decoding is enabled)
    /// or the raw response body.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The envelope reported a business failure, or its code field was
    /// missing or not an integer.
    #[error("{message}")]
    Envelope {
        /// Business code, when one could be read.
        code: Option<i64>,
        message: String,
    },

    /// The response body could not be decoded into the requested type.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Create a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        ClientError::Config(message.into())
    }

    /// Create a decode error.
    pub fn decode<S: Into<String>>(message: S) -> Self {
        ClientError::Decode(message.into())
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Business code attached to this error, if any.
    pub fn business_code(&self) -> Option<i64> {
        match self {
            ClientError::Envelope { code, .. } => *code,
            _ => None,
        }
    }

    /// Returns whether this error indicates a transient condition that may
    /// be resolved by retrying.
    ///
    /// Only transport failures qualify. HTTP statuses, envelope failures and
    /// an expired deadline are final.
    ///
    /// # Example
    ///
    /// ```
    /// use restc::ClientError;
    ///
    /// let err = ClientError::Transport("connection reset".into());
    /// assert!(err.is_retryable());
    ///
    /// let err = ClientError::decode("unexpected token");
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<http::Error> for ClientError {
    fn from(err: http::Error) -> Self {
        ClientError::Encode(format!("failed to build request: {}", err))
    }
}
