//! Fluent REST and WebSocket client for a single upstream endpoint.
//!
//! A [`Client`] holds one [`ConnectionConfig`]: scheme, host, port, default
//! headers, retry policy and transport. Requests are composed with
//! [`RequestBuilder`], executed with bounded retry, and decoded from a
//! [`CallResult`] according to [`DecodeOptions`].
//!
//! ## Features
//!
//! - Path templates with `{name}` and `:name` placeholders
//! - Query strings built from typed parameters, empty values dropped
//! - Bytes, text, JSON and streamed request bodies
//! - Retry of transport failures with a fixed delay, and an optional
//!   deadline for the whole call
//! - Decoding of plain JSON or `{code, message, data}` envelopes into serde
//!   types or protobuf messages
//! - Streamed response bodies and WebSocket connections
//!
//! ## Example
//!
//! ```ignore
//! use restc::{Client, DecodeOptions, PathParam, QueryParam};
//! use std::time::Duration;
//!
//! #[derive(serde::Deserialize, Default)]
//! struct Post { id: u64, title: String }
//!
//! let client = Client::builder("https://api.example.com")
//!     .header("authorization", "Bearer token")
//!     .retry_times(3)
//!     .retry_delay(Duration::from_millis(200))
//!     .build()?;
//!
//! let mut posts: Vec<Post> = Vec::new();
//! client
//!     .get()
//!     .path("/users/{id}/posts", [PathParam::new("id", 42)])
//!     .params([QueryParam::new("tag", vec!["rust", "http"])])
//!     .execute()
//!     .await
//!     .decode(&mut posts, &DecodeOptions::envelope())?;
//! ```
//!
//! ## Errors
//!
//! Everything fails with [`ClientError`]. [`RequestBuilder::execute`] never
//! returns an error itself: it is stored in the [`CallResult`] and returned
//! by [`CallResult::decode`] or [`CallResult::raw_response`].
//!
//! ## Streaming
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let mut body = client.get().path("/events", []).stream().await?;
//! while let Some(chunk) = body.next().await {
//!     handle(chunk?);
//! }
//! ```
//!
//! Dropping the stream closes the connection.
//!
//! ## WebSocket
//!
//! ```ignore
//! let (socket, handshake) = client.get().path("/ws", []).websocket().await?;
//! ```
//!
//! Opening a WebSocket moves the client's scheme from `http`/`https` to
//! `ws`/`wss` for good, and HTTP requests on that client fail afterwards.
//! Keep a separate client for WebSocket use.
//!
//! ## Tracing
//!
//! With the `tracing` feature (on by default) every call runs in an
//! `http.call` span carrying the method and URL, and retries are logged at
//! debug level.

mod builder;
mod client;
pub mod config;
mod error;
pub mod request;
mod resolve;
pub mod response;
pub mod transport;

#[cfg(test)]
mod testing;

pub use builder::ClientBuilder;
pub use client::Client;
pub use error::ClientError;

pub use config::{
    ConnectionConfig, FnHook, HeaderHook, HookContext, RequestHook, RetryPolicy, Scheme,
};

pub use request::{PathParam, QueryParam, RequestBody, RequestBuilder, render_path, render_query};

pub use response::{ByteStream, CallResult, DecodeOptions, EnvelopeExt, Metadata};

pub use transport::{
    HandshakeResponse, HyperTransport, HyperTransportBuilder, TlsClientConfig, Transport,
    TransportBody, WebSocket,
};

// Re-export commonly used types
pub use bytes::Bytes;
pub use http::{HeaderMap, Method, StatusCode};
pub use tokio_tungstenite::tungstenite::Message as WsMessage;
