//! Per-client connection settings.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use http::HeaderMap;

use super::hook::RequestHook;
use super::retry::RetryPolicy;
use super::scheme::Scheme;
use crate::transport::Transport;

/// Settings shared by every request built from a [`Client`](crate::Client).
///
/// Built with [`ClientBuilder`](crate::ClientBuilder). Scheme and host are
/// validated lazily, when the first URL is resolved, not at construction.
///
/// The configuration is read-only for HTTP calls. The one exception is the
/// WebSocket path: opening a WebSocket moves the scheme through the one-way
/// transition `http → ws` / `https → wss` (see [`Scheme::upgrade`]), and the
/// new scheme is visible to every holder of this configuration. HTTP calls
/// made through an upgraded configuration fail with a configuration error,
/// so a configuration that has opened a WebSocket should be dedicated to
/// WebSocket use.
///
/// Clones share the scheme cell, so the upgrade stays visible after a copy
/// made to replace other settings.
#[derive(Clone)]
pub struct ConnectionConfig {
    scheme: Arc<RwLock<Option<Scheme>>>,
    host: String,
    port: Option<u16>,
    headers: HeaderMap,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    hooks: Vec<Arc<dyn RequestHook>>,
    transport: Arc<dyn Transport>,
}

impl ConnectionConfig {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        scheme: Option<Scheme>,
        host: String,
        port: Option<u16>,
        headers: HeaderMap,
        retry: RetryPolicy,
        timeout: Option<Duration>,
        hooks: Vec<Arc<dyn RequestHook>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            scheme: Arc::new(RwLock::new(scheme)),
            host,
            port,
            headers,
            retry,
            timeout,
            hooks,
            transport,
        }
    }

    /// Current scheme, if one was configured.
    pub fn scheme(&self) -> Option<Scheme> {
        *self.scheme.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Upstream host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicitly configured port. The scheme's default applies when `None`.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Default headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Retry policy applied to transport failures.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Deadline for a whole call, retries included.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn hooks(&self) -> &[Arc<dyn RequestHook>] {
        &self.hooks
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn set_headers(&mut self, headers: HeaderMap) {
        self.headers = headers;
    }

    /// Move the scheme to its WebSocket counterpart and return the result.
    ///
    /// Returns `None` when no scheme is configured. Repeated calls are
    /// no-ops once the scheme is a WebSocket scheme.
    pub(crate) fn upgrade_scheme(&self) -> Option<Scheme> {
        let mut scheme = self.scheme.write().unwrap_or_else(PoisonError::into_inner);
        let upgraded = scheme.map(Scheme::upgrade);
        #[cfg(feature = "tracing")]
        {
            if *scheme != upgraded {
                tracing::debug!(from = ?*scheme, to = ?upgraded, host = %self.host, "upgrading scheme for websocket");
            }
        }
        *scheme = upgraded;
        upgraded
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("scheme", &self.scheme())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("headers", &self.headers)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}
