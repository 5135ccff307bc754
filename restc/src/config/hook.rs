//! Request hooks.
//!
//! Hooks run against every outgoing request, after the default headers have
//! been copied in and just before the request is handed to the transport.
//! They are the only place where headers can vary per request, for example:
//! - Adding authentication headers
//! - Stamping request ids
//! - Refusing calls that should not leave the process
//!
//! # Example
//!
//! ```ignore
//! use restc::{Client, FnHook, HeaderHook, HookContext};
//!
//! let client = Client::builder("http://127.0.0.1:8080")
//!     .with_hook(HeaderHook::new("authorization", "Bearer token123"))
//!     .with_hook(FnHook::new(|ctx: &mut HookContext<'_>| {
//!         ctx.headers.insert("x-request-id", "abc-123".parse().unwrap());
//!         Ok(())
//!     }))
//!     .build()?;
//! ```

use http::{HeaderMap, Method};

use crate::ClientError;

/// The request a hook can inspect and modify.
#[derive(Debug)]
pub struct HookContext<'a> {
    /// Request method.
    pub method: &'a Method,
    /// Fully resolved request URL.
    pub url: &'a str,
    /// Request headers (mutable).
    pub headers: &'a mut HeaderMap,
}

impl<'a> HookContext<'a> {
    /// Create a new hook context.
    pub fn new(method: &'a Method, url: &'a str, headers: &'a mut HeaderMap) -> Self {
        Self {
            method,
            url,
            headers,
        }
    }
}

/// Trait for hooks that run before a request is executed.
///
/// Returning an error aborts the call; the error is surfaced to the caller
/// as-is and no transport call is made.
pub trait RequestHook: Send + Sync {
    /// Called once per call, before the first attempt.
    fn before_request(&self, ctx: &mut HookContext<'_>) -> Result<(), ClientError>;
}

/// Run every hook in registration order, stopping at the first error.
pub(crate) fn run_hooks(
    hooks: &[std::sync::Arc<dyn RequestHook>],
    ctx: &mut HookContext<'_>,
) -> Result<(), ClientError> {
    for hook in hooks {
        hook.before_request(ctx)?;
    }
    Ok(())
}

/// A hook that sets a header on every request, replacing any existing
/// value for that name.
///
/// # Example
///
/// ```ignore
/// use restc::HeaderHook;
///
/// let auth = HeaderHook::new("authorization", "Bearer token123");
/// ```
#[derive(Clone, Debug)]
pub struct HeaderHook {
    name: http::HeaderName,
    value: http::HeaderValue,
}

impl HeaderHook {
    /// Create a new header hook.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.parse().expect("invalid header name"),
            value: value.parse().expect("invalid header value"),
        }
    }

    /// Try to create a new header hook, returning an error if invalid.
    pub fn try_new(name: &str, value: &str) -> Result<Self, ClientError> {
        let name = name
            .parse()
            .map_err(|_| ClientError::config(format!("invalid header name: {}", name)))?;
        let value = value
            .parse()
            .map_err(|_| ClientError::config(format!("invalid header value: {}", value)))?;
        Ok(Self { name, value })
    }

    /// Create a new header hook from pre-parsed values.
    pub fn from_parts(name: http::HeaderName, value: http::HeaderValue) -> Self {
        Self { name, value }
    }
}

impl RequestHook for HeaderHook {
    fn before_request(&self, ctx: &mut HookContext<'_>) -> Result<(), ClientError> {
        ctx.headers.insert(self.name.clone(), self.value.clone());
        Ok(())
    }
}

/// A wrapper that adapts a closure to the [`RequestHook`] trait.
pub struct FnHook<F> {
    before: F,
}

impl<F> FnHook<F>
where
    F: Fn(&mut HookContext<'_>) -> Result<(), ClientError> + Send + Sync,
{
    /// Create a new hook from a closure.
    pub fn new(before: F) -> Self {
        Self { before }
    }
}

impl<F> std::fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHook").finish()
    }
}

impl<F> RequestHook for FnHook<F>
where
    F: Fn(&mut HookContext<'_>) -> Result<(), ClientError> + Send + Sync,
{
    fn before_request(&self, ctx: &mut HookContext<'_>) -> Result<(), ClientError> {
        (self.before)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_header_hook() {
        let hook = HeaderHook::new("x-custom-header", "test-value");
        let mut headers = HeaderMap::new();
        let mut ctx = HookContext::new(&Method::GET, "http://localhost:80/", &mut headers);

        hook.before_request(&mut ctx).unwrap();

        assert_eq!(headers.get("x-custom-header").unwrap(), "test-value");
    }

    #[test]
    fn test_header_hook_try_new_rejects_invalid_name() {
        assert!(matches!(
            HeaderHook::try_new("bad header", "v"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_hooks_run_in_order() {
        let hooks: Vec<Arc<dyn RequestHook>> = vec![
            Arc::new(HeaderHook::new("x-order", "first")),
            Arc::new(FnHook::new(|ctx: &mut HookContext<'_>| {
                let previous = ctx.headers.get("x-order").cloned();
                assert_eq!(previous.unwrap(), "first");
                ctx.headers.insert("x-order", "second".parse().unwrap());
                Ok(())
            })),
        ];

        let mut headers = HeaderMap::new();
        let mut ctx = HookContext::new(&Method::POST, "http://localhost:80/", &mut headers);
        run_hooks(&hooks, &mut ctx).unwrap();

        assert_eq!(headers.get("x-order").unwrap(), "second");
    }

    #[test]
    fn test_failing_hook_stops_chain() {
        let hooks: Vec<Arc<dyn RequestHook>> = vec![
            Arc::new(FnHook::new(|_: &mut HookContext<'_>| {
                Err(ClientError::config("not logged in"))
            })),
            Arc::new(HeaderHook::new("x-never", "set")),
        ];

        let mut headers = HeaderMap::new();
        let mut ctx = HookContext::new(&Method::GET, "http://localhost:80/", &mut headers);
        let err = run_hooks(&hooks, &mut ctx).unwrap_err();

        assert_eq!(err.to_string(), "not logged in");
        assert!(headers.get("x-never").is_none());
    }
}
