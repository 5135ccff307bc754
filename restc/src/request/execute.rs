//! Request execution.
//!
//! Every entry point follows the same steps:
//!
//! 1. Resolve the URL (this fails fast on missing scheme or host)
//! 2. Copy the default headers and run the request hooks
//! 3. Send through the transport under the retry policy
//! 4. Capture or hand over the response
//!
//! The configured deadline covers steps 3 and 4 as a whole, so an expired
//! deadline never leads to another retry.

use std::future::Future;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use http_body_util::BodyExt;

#[cfg(feature = "tracing")]
use tracing::{Instrument, info_span};

use super::body::RequestBody;
use crate::ClientError;
use crate::config::{ConnectionConfig, HookContext, RetryPolicy, retry_with_policy, run_hooks};
use crate::resolve;
use crate::response::{ByteStream, CallResult, Metadata};
use crate::transport::{HandshakeResponse, ResponseBody, TransportBody, WebSocket};

/// Accumulated state of a request under construction.
#[derive(Debug)]
pub(crate) struct RequestParts {
    pub(crate) method: Method,
    pub(crate) path_template: String,
    pub(crate) path: String,
    pub(crate) query: String,
    pub(crate) body: RequestBody,
}

impl RequestParts {
    pub(crate) fn new(method: Method) -> Self {
        Self {
            method,
            path_template: String::new(),
            path: String::new(),
            query: String::new(),
            body: RequestBody::Empty,
        }
    }
}

/// Execute and capture the whole response. Never fails; errors are stored
/// in the result.
pub(crate) async fn execute(config: &ConnectionConfig, parts: RequestParts) -> CallResult {
    match call(config, parts).await {
        Ok(result) => result,
        Err(err) => CallResult::from_error(err),
    }
}

async fn call(config: &ConnectionConfig, parts: RequestParts) -> Result<CallResult, ClientError> {
    let url = resolve::http_url(config, &parts.path, &parts.query)?;
    let headers = prepare_headers(config, &parts.method, &url, parts.body.content_type())?;

    #[cfg(feature = "tracing")]
    let span = info_span!(
        "http.call",
        http.method = %parts.method,
        http.url = %url,
        otel.kind = "client",
    );

    let exchange = async {
        let response = send(config, &parts.method, &url, &headers, parts.body).await?;
        let (head, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        #[cfg(feature = "tracing")]
        tracing::debug!(status = %head.status, body_len = body.len(), "response received");

        Ok::<_, ClientError>(CallResult::new(head.status, head.headers, body))
    };

    #[cfg(feature = "tracing")]
    let exchange = exchange.instrument(span);

    with_deadline(config.timeout(), exchange).await
}

/// Execute and hand over the body of a 200 response as a stream.
///
/// The deadline covers the exchange up to the response head; reading the
/// stream is the caller's business.
pub(crate) async fn stream(
    config: &ConnectionConfig,
    parts: RequestParts,
) -> Result<ByteStream, ClientError> {
    let url = resolve::http_url(config, &parts.path, &parts.query)?;
    let headers = prepare_headers(config, &parts.method, &url, parts.body.content_type())?;

    #[cfg(feature = "tracing")]
    let span = info_span!(
        "http.stream",
        http.method = %parts.method,
        http.url = %url,
        otel.kind = "client",
    );

    let exchange = send(config, &parts.method, &url, &headers, parts.body);

    #[cfg(feature = "tracing")]
    let exchange = exchange.instrument(span);

    let response = with_deadline(config.timeout(), exchange).await?;
    let (head, body) = response.into_parts();
    if head.status != StatusCode::OK {
        return Err(ClientError::Protocol(format!(
            "unhealthy status code: [{}], status message: [{}]",
            head.status.as_u16(),
            head.status
        )));
    }
    Ok(ByteStream::new(head.status, Metadata::new(head.headers), body))
}

/// Upgrade the configuration's scheme and open a WebSocket.
pub(crate) async fn websocket(
    config: &ConnectionConfig,
    parts: RequestParts,
) -> Result<(WebSocket, HandshakeResponse), ClientError> {
    let url = resolve::websocket_url(config, &parts.path, &parts.query)?;
    let headers = prepare_headers(config, &Method::GET, &url, None)?;

    let mut request = http::Request::builder().uri(url.as_str()).body(())?;
    *request.headers_mut() = headers;

    #[cfg(feature = "tracing")]
    tracing::debug!(url = %url, "opening websocket");

    with_deadline(config.timeout(), config.transport().connect_websocket(request)).await
}

/// Default headers plus the body's content type, then every hook.
fn prepare_headers(
    config: &ConnectionConfig,
    method: &Method,
    url: &str,
    content_type: Option<&'static str>,
) -> Result<HeaderMap, ClientError> {
    let mut headers = config.headers().clone();
    if let Some(content_type) = content_type {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }
    run_hooks(config.hooks(), &mut HookContext::new(method, url, &mut headers))?;
    Ok(headers)
}

/// Send under the retry policy. Stream bodies get a single attempt.
async fn send(
    config: &ConnectionConfig,
    method: &Method,
    url: &str,
    headers: &HeaderMap,
    mut body: RequestBody,
) -> Result<http::Response<ResponseBody>, ClientError> {
    let policy = if body.is_replayable() {
        config.retry_policy().clone()
    } else {
        RetryPolicy::no_retry()
    };
    let transport = config.transport();

    retry_with_policy(&policy, |_attempt| {
        let request = build_request(method, url, headers, body.take_attempt());
        async move { transport.send(request?).await }
    })
    .await
}

fn build_request(
    method: &Method,
    url: &str,
    headers: &HeaderMap,
    body: TransportBody,
) -> Result<http::Request<TransportBody>, ClientError> {
    let mut request = http::Request::builder()
        .method(method.clone())
        .uri(url)
        .body(body)?;
    *request.headers_mut() = headers.clone();
    Ok(request)
}

async fn with_deadline<F, T>(deadline: Option<Duration>, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ClientError::DeadlineExceeded(limit))?,
        None => fut.await,
    }
}
