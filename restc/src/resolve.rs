//! URL resolution against a [`ConnectionConfig`].

use crate::ClientError;
use crate::config::{ConnectionConfig, Scheme};

const INVALID_URL: &str = "invalid url, please check";

/// Scheme and `host:port` authority, with the scheme's default port applied
/// when none is configured.
fn base(config: &ConnectionConfig) -> Result<(Scheme, String), ClientError> {
    let scheme = match config.scheme() {
        Some(scheme) if !config.host().is_empty() => scheme,
        _ => return Err(ClientError::config(INVALID_URL)),
    };
    let port = config.port().unwrap_or_else(|| scheme.default_port());
    Ok((scheme, format!("{}:{}", config.host(), port)))
}

/// Absolute URL for an HTTP call: `scheme://host:port` + path + query.
///
/// Fails once the configuration has been upgraded for WebSocket use.
pub(crate) fn http_url(
    config: &ConnectionConfig,
    path: &str,
    query: &str,
) -> Result<String, ClientError> {
    let (scheme, authority) = base(config)?;
    if scheme.is_websocket() {
        return Err(ClientError::config(format!(
            "scheme is {scheme}, http requests are not allowed on a websocket configuration"
        )));
    }
    Ok(format!("{scheme}://{authority}{path}{query}"))
}

/// Absolute URL for a WebSocket handshake.
///
/// Moves the shared configuration's scheme to its WebSocket counterpart.
pub(crate) fn websocket_url(
    config: &ConnectionConfig,
    path: &str,
    query: &str,
) -> Result<String, ClientError> {
    let (_, authority) = base(config)?;
    let scheme = config
        .upgrade_scheme()
        .ok_or_else(|| ClientError::config(INVALID_URL))?;
    Ok(format!("{scheme}://{authority}{path}{query}"))
}
