//! Response types.
//!
//! This module provides [`CallResult`], the captured outcome of one executed
//! request, along with [`Metadata`] for response headers and the
//! [`DecodeOptions`] that control how a body is interpreted.

mod decoder;
mod envelope;
mod stream;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::ClientError;

pub use decoder::{DEFAULT_CODE_FIELD, DEFAULT_DATA_FIELD, DEFAULT_MESSAGE_FIELD, DecodeOptions};
pub use envelope::EnvelopeExt;
pub use stream::ByteStream;

/// Outcome of an executed request.
///
/// Holds the response body, status and headers, or the error that kept the
/// call from producing a response. When [`error`](Self::error) is set the
/// other fields carry no meaning.
///
/// # Example
///
/// ```ignore
/// use restc::DecodeOptions;
///
/// #[derive(serde::Deserialize, Default)]
/// struct User { name: String }
///
/// let result = client.get().path("/users/{id}", [PathParam::new("id", 7)]).execute().await;
///
/// let mut user = User::default();
/// result.decode(&mut user, &DecodeOptions::envelope())?;
/// ```
#[derive(Clone, Debug)]
pub struct CallResult {
    body: Bytes,
    status: Option<StatusCode>,
    headers: Metadata,
    error: Option<ClientError>,
}

impl CallResult {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            body,
            status: Some(status),
            headers: Metadata::new(headers),
            error: None,
        }
    }

    pub(crate) fn from_error(error: ClientError) -> Self {
        Self {
            body: Bytes::new(),
            status: None,
            headers: Metadata::empty(),
            error: Some(error),
        }
    }

    /// The body and the stored error, untouched by any envelope logic.
    ///
    /// Calling this any number of times returns the same values.
    pub fn raw_response(&self) -> (Bytes, Option<ClientError>) {
        (self.body.clone(), self.error.clone())
    }

    /// HTTP status, or `None` when the call failed before a response.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
    }

    /// Status line text such as `"200 OK"`; empty without a response.
    pub fn status_text(&self) -> String {
        self.status.map(|s| s.to_string()).unwrap_or_default()
    }

    /// The error that kept the call from producing a response.
    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    /// Response headers.
    pub fn headers(&self) -> &Metadata {
        &self.headers
    }

    /// Whether a response arrived with status 200.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status == Some(StatusCode::OK)
    }

    pub(crate) fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Response metadata wrapper around HTTP headers.
///
/// Provides convenient access to response headers returned by the server.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    headers: HeaderMap,
}

impl Metadata {
    /// Create new metadata from HTTP headers.
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Create empty metadata.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get a header value by name.
    ///
    /// Returns `None` if the header is not present or cannot be converted to a string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }

    /// Check if a header exists.
    pub fn contains(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }

    /// Get all values for a header (for headers that appear multiple times).
    pub fn get_all(&self, key: &str) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(key)
            .iter()
            .filter_map(|v| v.to_str().ok())
    }

    /// Get the underlying HeaderMap.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Consume self and return the underlying HeaderMap.
    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }

    /// Returns true if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns the number of headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }
}

impl From<HeaderMap> for Metadata {
    fn from(headers: HeaderMap) -> Self {
        Self::new(headers)
    }
}

impl From<Metadata> for HeaderMap {
    fn from(metadata: Metadata) -> Self {
        metadata.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    #[test]
    fn test_raw_response_is_idempotent() {
        let result = CallResult::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            HeaderMap::new(),
            Bytes::from_static(b"{\"code\":500}"),
        );
        let first = result.raw_response();
        let second = result.raw_response();
        assert_eq!(first.0, Bytes::from_static(b"{\"code\":500}"));
        assert_eq!(first.0, second.0);
        assert!(first.1.is_none() && second.1.is_none());
    }

    #[test]
    fn test_raw_response_carries_error() {
        let result = CallResult::from_error(ClientError::Transport("refused".into()));
        let (body, err) = result.raw_response();
        assert!(body.is_empty());
        assert!(matches!(err, Some(ClientError::Transport(_))));
        assert_eq!(result.status_code(), None);
        assert_eq!(result.status_text(), "");
        assert!(!result.is_success());
    }

    #[test]
    fn test_status_text() {
        let result = CallResult::new(StatusCode::OK, HeaderMap::new(), Bytes::new());
        assert_eq!(result.status_text(), "200 OK");
        assert!(result.is_success());
    }

    #[test]
    fn test_metadata_get() {
        let mut headers = HeaderMap::new();
        headers.insert("x-custom", HeaderValue::from_static("value"));
        let metadata = Metadata::new(headers);

        assert_eq!(metadata.get("x-custom"), Some("value"));
        assert_eq!(metadata.get("missing"), None);
        assert!(metadata.contains("x-custom"));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_metadata_get_all() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        let metadata = Metadata::from(headers);

        let values: Vec<_> = metadata.get_all("set-cookie").collect();
        assert_eq!(values, ["a=1", "b=2"]);
    }
}
