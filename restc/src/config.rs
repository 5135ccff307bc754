//! Configuration modules for the client.
//!
//! This module contains client-level configuration:
//! - [`ConnectionConfig`]: Scheme, host, port, default headers and transport
//! - [`Scheme`]: URL scheme with its one-way WebSocket upgrade
//! - [`RetryPolicy`]: Bounded retry with a fixed delay
//! - [`RequestHook`]: Per-request header mutation before execution

mod connection;
mod hook;
mod retry;
mod scheme;

pub use connection::ConnectionConfig;
pub(crate) use hook::run_hooks;
pub use hook::{FnHook, HeaderHook, HookContext, RequestHook};
pub use retry::{RetryPolicy, defaults, retry_with_policy};
pub use scheme::Scheme;
