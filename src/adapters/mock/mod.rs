//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`RecordingExecutor`] - click action executor that records what fired

pub mod executor;
pub mod http;

pub use executor::RecordingExecutor;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
