//! The client entry point.

use std::sync::Arc;

use http::{HeaderMap, Method};

use crate::ClientError;
use crate::builder::ClientBuilder;
use crate::config::ConnectionConfig;
use crate::request::RequestBuilder;

/// A handle on one upstream endpoint.
///
/// Cloning is cheap: clones share the same [`ConnectionConfig`], including
/// the one-way scheme upgrade performed by
/// [`RequestBuilder::websocket`].
///
/// # Example
///
/// ```ignore
/// use restc::{Client, DecodeOptions, PathParam};
///
/// let client = Client::new("https://api.example.com")?;
///
/// #[derive(serde::Deserialize, Default)]
/// struct User { name: String }
///
/// let mut user = User::default();
/// client
///     .get()
///     .path("/users/{id}", [PathParam::new("id", 7)])
///     .execute()
///     .await
///     .decode(&mut user, &DecodeOptions::envelope())?;
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    config: Arc<ConnectionConfig>,
}

impl Client {
    /// Create a client for `target` with default settings.
    pub fn new<S: Into<String>>(target: S) -> Result<Self, ClientError> {
        Self::builder(target).build()
    }

    /// Start configuring a client for `target`.
    pub fn builder<S: Into<String>>(target: S) -> ClientBuilder {
        ClientBuilder::from_target(target)
    }

    /// Wrap an existing configuration.
    pub fn from_config(config: ConnectionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Start a request with the given method.
    pub fn verb(&self, method: Method) -> RequestBuilder {
        RequestBuilder::new(self.config.clone(), method)
    }

    /// Start a GET request.
    pub fn get(&self) -> RequestBuilder {
        self.verb(Method::GET)
    }

    /// Start a POST request.
    pub fn post(&self) -> RequestBuilder {
        self.verb(Method::POST)
    }

    /// Start a PUT request.
    pub fn put(&self) -> RequestBuilder {
        self.verb(Method::PUT)
    }

    /// Start a PATCH request.
    pub fn patch(&self) -> RequestBuilder {
        self.verb(Method::PATCH)
    }

    /// Start a DELETE request.
    pub fn delete(&self) -> RequestBuilder {
        self.verb(Method::DELETE)
    }

    /// Default headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        self.config.headers()
    }

    /// Replace the default headers.
    ///
    /// Other clones of this client keep the headers they had but still share
    /// the scheme, including a later WebSocket upgrade.
    pub fn set_headers(&mut self, headers: HeaderMap) {
        Arc::make_mut(&mut self.config).set_headers(headers);
    }

    /// The shared connection settings.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}
