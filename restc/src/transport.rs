//! Transport layer.
//!
//! The request pipeline only needs two things from the network:
//!
//! - send an HTTP request and get status, headers and a body back
//! - open an upgraded, bidirectional WebSocket connection
//!
//! Both are expressed by the [`Transport`] trait. [`HyperTransport`] is the
//! default implementation, using hyper_util's legacy client with rustls.
//! Tests and embedders can supply their own implementation through
//! [`ClientBuilder::transport`](crate::ClientBuilder::transport).
//!
//! # Feature Flags
//!
//! TLS support requires enabling the appropriate features:
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots` for convenience
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates

mod connector;
mod hyper;
mod websocket;

use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::combinators::UnsyncBoxBody;

use crate::ClientError;

pub use connector::{build_https_connector, danger_accept_invalid_certs_config, has_tls_support};

#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
pub use connector::default_tls_config;

pub use hyper::{HyperTransport, HyperTransportBuilder};
pub use websocket::{HandshakeResponse, WebSocket, dial_websocket};

// Re-export rustls types that users might need for TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;

/// Request body handed to a [`Transport`], rebuilt for every attempt.
pub type TransportBody = UnsyncBoxBody<Bytes, ClientError>;

/// Response body handed back by a [`Transport`].
pub type ResponseBody = UnsyncBoxBody<Bytes, ClientError>;

/// The network boundary used by the executor.
///
/// Implementations report connection and IO failures as
/// [`ClientError::Transport`] so the executor can retry them. Any HTTP status
/// is a successful exchange at this level.
pub trait Transport: Send + Sync + 'static {
    /// Send one HTTP request.
    fn send(
        &self,
        request: http::Request<TransportBody>,
    ) -> BoxFuture<'_, Result<http::Response<ResponseBody>, ClientError>>;

    /// Perform a WebSocket handshake.
    ///
    /// The default implementation dials with `tokio-tungstenite`.
    fn connect_websocket(
        &self,
        request: http::Request<()>,
    ) -> BoxFuture<'_, Result<(WebSocket, HandshakeResponse), ClientError>> {
        Box::pin(dial_websocket(request, None))
    }
}
