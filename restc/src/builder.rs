//! Client builder.
//!
//! Provides a fluent API for configuring and building a [`Client`].

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::ClientError;
use crate::client::Client;
use crate::config::{ConnectionConfig, RequestHook, RetryPolicy, Scheme};
use crate::transport::{HyperTransport, Transport};

/// Builder for creating a [`Client`].
///
/// Connection settings come from a target URL, from discrete fields, or
/// both: discrete fields override what the target provides. Scheme and host
/// are checked when the first request resolves its URL, not here.
///
/// # Example
///
/// ```ignore
/// use restc::{Client, ClientBuilder, Scheme};
/// use std::time::Duration;
///
/// let client = Client::builder("https://api.example.com:8443")
///     .header("x-api-key", "secret")
///     .retry_times(3)
///     .retry_delay(Duration::from_millis(200))
///     .build()?;
///
/// let client = ClientBuilder::new()
///     .scheme(Scheme::Http)
///     .host("127.0.0.1")
///     .port(8080)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    /// Target URL such as `https://host:8443`.
    target: Option<String>,
    scheme: Option<Scheme>,
    host: Option<String>,
    port: Option<u16>,
    /// Default headers sent with every request.
    headers: HeaderMap,
    /// First invalid header, reported by `build`.
    header_error: Option<ClientError>,
    retry: RetryPolicy,
    /// Deadline for a whole call, retries included.
    timeout: Option<Duration>,
    hooks: Vec<Arc<dyn RequestHook>>,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("target", &self.target)
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("headers", &self.headers)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("hook_count", &self.hooks.len())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a builder with no target; set scheme, host and port directly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a target URL, e.g. `"http://127.0.0.1:8080"`.
    ///
    /// The target is parsed by [`build`](Self::build). An unsupported
    /// scheme is not rejected there; requests fail later with
    /// `"invalid url, please check"`.
    pub fn from_target<S: Into<String>>(target: S) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Set the scheme.
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Set the host name or address.
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port. When unset, 80 or 443 is used depending on the scheme.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Append a default header.
    ///
    /// Repeated names keep every value. An invalid name or value makes
    /// [`build`](Self::build) fail.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.header_error.is_some() {
            return self;
        }
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::config(format!("invalid header name: {}", name)))
            .and_then(|name| {
                HeaderValue::from_str(value)
                    .map(|value| (name, value))
                    .map_err(|_| ClientError::config(format!("invalid header value: {}", value)))
            });
        match parsed {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(err) => self.header_error = Some(err),
        }
        self
    }

    /// Replace all default headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the total number of attempts for transport failures.
    ///
    /// `0` behaves like `1`.
    pub fn retry_times(mut self, retry_times: u32) -> Self {
        self.retry.retry_times = retry_times;
        self
    }

    /// Set the wait between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry.delay = delay;
        self
    }

    /// Set the whole retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Bound every call, retries and sleeps included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a request hook.
    ///
    /// Hooks run in the order they're added.
    pub fn with_hook<H: RequestHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Use a custom transport instead of [`HyperTransport`].
    pub fn transport<T: Transport>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client.
    ///
    /// Fails on an unparsable target, an invalid default header, or when the
    /// default transport cannot be created.
    pub fn build(self) -> Result<Client, ClientError> {
        if let Some(err) = self.header_error {
            return Err(err);
        }

        let (mut scheme, mut host, mut port) = (None, String::new(), None);
        if let Some(target) = &self.target {
            let url = url::Url::parse(target)
                .map_err(|e| ClientError::config(format!("invalid target {}: {}", target, e)))?;
            scheme = url.scheme().parse::<Scheme>().ok();
            host = url.host_str().unwrap_or_default().to_owned();
            port = url.port();
        }
        let scheme = self.scheme.or(scheme);
        let host = self.host.unwrap_or(host);
        let port = self.port.or(port);

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HyperTransport::new()?),
        };

        Ok(Client::from_config(ConnectionConfig::new(
            scheme,
            host,
            port,
            self.headers,
            self.retry,
            self.timeout,
            self.hooks,
            transport,
        )))
    }
}
