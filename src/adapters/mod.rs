//! Concrete implementations of the trait seams in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - configurable HTTP responses
//! - [`mock::RecordingExecutor`] - records resolved click actions

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockHttpClient, RecordingExecutor};
pub use reqwest_http::ReqwestHttpClient;
