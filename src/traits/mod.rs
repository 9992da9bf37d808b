//! Trait seams between chatmod's logic and the outside world.
//!
//! - [`HttpClient`] - request/response calls made by batch handlers
//!
//! The click executor seam lives next to the click types as
//! [`ActionExecutor`](crate::click::ActionExecutor).

pub mod http;

pub use http::{json_headers, Headers, HttpClient, HttpError, Response};
