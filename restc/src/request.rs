//! Request-side modules.
//!
//! - [`RequestBuilder`]: fluent request construction and execution
//! - [`RequestBody`]: body shapes
//! - [`PathParam`] / [`QueryParam`]: path templating and query rendering

mod body;
mod builder;
mod execute;
mod params;

pub use body::RequestBody;
pub use builder::RequestBuilder;
pub use params::{PathParam, QueryParam, render_path, render_query};
