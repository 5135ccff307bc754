//! Request body shapes.

use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use http_body::Frame;
use http_body_util::{BodyExt, Empty, Full, StreamBody};

use crate::ClientError;
use crate::transport::TransportBody;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ClientError>> + Send>>;

/// The body of an outgoing request.
///
/// Bytes and text are sent verbatim. `Json` holds an already serialized
/// document and adds `content-type: application/json` unless a default
/// header sets one. A `Stream` body is forwarded as-is and can only be
/// sent once, so calls carrying one are never retried.
#[derive(Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes.
    Bytes(Bytes),
    /// Text, sent as UTF-8.
    Text(String),
    /// Serialized JSON.
    Json(Bytes),
    /// A caller-supplied byte stream.
    Stream(ByteStream),
}

impl RequestBody {
    /// Serialize `value` as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        serde_json::to_vec(value)
            .map(|data| RequestBody::Json(Bytes::from(data)))
            .map_err(|e| ClientError::Encode(format!("failed to serialize body: {}", e)))
    }

    /// Wrap a byte stream.
    pub fn stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        RequestBody::Stream(Box::pin(stream.map(|chunk| {
            chunk.map_err(|e| ClientError::Transport(format!("body stream failed: {}", e)))
        })))
    }

    /// Whether the body can be sent more than once.
    pub fn is_replayable(&self) -> bool {
        !matches!(self, RequestBody::Stream(_))
    }

    pub(crate) fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Json(_) => Some("application/json"),
            _ => None,
        }
    }

    /// Produce the body for one attempt.
    ///
    /// A stream body is handed out on the first call; later calls get an
    /// empty body.
    pub(crate) fn take_attempt(&mut self) -> TransportBody {
        match self {
            RequestBody::Empty => empty_body(),
            RequestBody::Bytes(data) | RequestBody::Json(data) => full_body(data.clone()),
            RequestBody::Text(text) => full_body(Bytes::from(text.clone())),
            RequestBody::Stream(_) => match std::mem::take(self) {
                RequestBody::Stream(stream) => {
                    StreamBody::new(stream.map_ok(Frame::data)).boxed_unsync()
                }
                _ => empty_body(),
            },
        }
    }
}

fn empty_body() -> TransportBody {
    Empty::new().map_err(|never| match never {}).boxed_unsync()
}

fn full_body(data: Bytes) -> TransportBody {
    Full::new(data).map_err(|never| match never {}).boxed_unsync()
}

impl From<Bytes> for RequestBody {
    fn from(data: Bytes) -> Self {
        RequestBody::Bytes(data)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(data: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(data))
    }
}

impl From<&'static [u8]> for RequestBody {
    fn from(data: &'static [u8]) -> Self {
        RequestBody::Bytes(Bytes::from_static(data))
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_owned())
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Empty => write!(f, "RequestBody::Empty"),
            RequestBody::Bytes(data) => f
                .debug_struct("RequestBody::Bytes")
                .field("len", &data.len())
                .finish(),
            RequestBody::Text(text) => f
                .debug_struct("RequestBody::Text")
                .field("len", &text.len())
                .finish(),
            RequestBody::Json(data) => f
                .debug_struct("RequestBody::Json")
                .field("len", &data.len())
                .finish(),
            RequestBody::Stream(_) => write!(f, "RequestBody::Stream"),
        }
    }
}
