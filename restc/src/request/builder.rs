//! Fluent request builder.

use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use http::Method;
use serde::Serialize;

use super::body::RequestBody;
use super::execute::{self, RequestParts};
use super::params::{PathParam, QueryParam, render_path, render_query};
use crate::ClientError;
use crate::config::ConnectionConfig;
use crate::response::{ByteStream, CallResult};
use crate::transport::{HandshakeResponse, WebSocket};

/// A request under construction.
///
/// Every method consumes and returns the builder. The first error (for
/// example a body that fails to serialize) is kept, later calls leave it in
/// place, and it is reported when the request is executed.
///
/// # Example
///
/// ```ignore
/// use restc::{Client, DecodeOptions, PathParam, QueryParam};
///
/// let client = Client::new("http://127.0.0.1:8080")?;
/// let result = client
///     .get()
///     .path("/users/{id}/posts", [PathParam::new("id", 42)])
///     .params([QueryParam::new("tag", vec!["a", "b"])])
///     .execute()
///     .await;
/// ```
#[must_use = "a request does nothing until it is executed"]
pub struct RequestBuilder {
    config: Arc<ConnectionConfig>,
    state: Result<RequestParts, ClientError>,
}

impl RequestBuilder {
    pub(crate) fn new(config: Arc<ConnectionConfig>, method: Method) -> Self {
        Self {
            config,
            state: Ok(RequestParts::new(method)),
        }
    }

    fn update(self, f: impl FnOnce(RequestParts) -> Result<RequestParts, ClientError>) -> Self {
        Self {
            config: self.config,
            state: self.state.and_then(f),
        }
    }

    /// Set the HTTP method.
    pub fn verb(self, method: Method) -> Self {
        self.update(|mut parts| {
            parts.method = method;
            Ok(parts)
        })
    }

    /// Set the path from a template and its substitutions.
    ///
    /// The template should start with `/`. See [`render_path`].
    pub fn path<I>(self, template: &str, params: I) -> Self
    where
        I: IntoIterator<Item = PathParam>,
    {
        let params: Vec<PathParam> = params.into_iter().collect();
        self.update(|mut parts| {
            parts.path = render_path(template, &params);
            parts.path_template = template.to_owned();
            Ok(parts)
        })
    }

    /// Set the query string, replacing any previous one.
    ///
    /// See [`render_query`].
    pub fn params<I>(self, params: I) -> Self
    where
        I: IntoIterator<Item = QueryParam>,
    {
        let params: Vec<QueryParam> = params.into_iter().collect();
        self.update(|mut parts| {
            parts.query = render_query(&params);
            Ok(parts)
        })
    }

    /// Set the body.
    pub fn body(self, body: impl Into<RequestBody>) -> Self {
        let body = body.into();
        self.update(|mut parts| {
            parts.body = body;
            Ok(parts)
        })
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        let body = RequestBody::json(value);
        self.update(|mut parts| {
            parts.body = body?;
            Ok(parts)
        })
    }

    /// Send `text` verbatim.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.body(RequestBody::Text(text.into()))
    }

    /// Send `data` verbatim.
    pub fn bytes(self, data: impl Into<Bytes>) -> Self {
        self.body(RequestBody::Bytes(data.into()))
    }

    /// Send a byte stream. The request is attempted once.
    pub fn body_stream<S, E>(self, stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.body(RequestBody::stream(stream))
    }

    /// The error kept by an earlier builder call, if any.
    pub fn error(&self) -> Option<&ClientError> {
        self.state.as_ref().err()
    }

    /// The path template as given to [`path`](Self::path).
    pub fn path_template(&self) -> Option<&str> {
        self.state.as_ref().ok().map(|parts| parts.path_template.as_str())
    }

    /// The path after substitution.
    pub fn resolved_path(&self) -> Option<&str> {
        self.state.as_ref().ok().map(|parts| parts.path.as_str())
    }

    /// The rendered query string, including its leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.state.as_ref().ok().map(|parts| parts.query.as_str())
    }

    /// Execute and capture the response.
    ///
    /// Never fails by itself: every error, including one kept by the builder,
    /// ends up in [`CallResult::error`].
    pub async fn execute(self) -> CallResult {
        match self.state {
            Ok(parts) => execute::execute(&self.config, parts).await,
            Err(err) => CallResult::from_error(err),
        }
    }

    /// Execute and return the body of a 200 response as a stream.
    ///
    /// Any other status is an error and the body is not read.
    pub async fn stream(self) -> Result<ByteStream, ClientError> {
        execute::stream(&self.config, self.state?).await
    }

    /// Open a WebSocket at this request's path and query.
    ///
    /// This moves the client configuration's scheme to `ws`/`wss` for good;
    /// see [`ConnectionConfig`].
    pub async fn websocket(self) -> Result<(WebSocket, HandshakeResponse), ClientError> {
        execute::websocket(&self.config, self.state?).await
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
