//! Core types and traits for the sluice HTTP client.
//!
//! This crate provides the foundational types used by sluice:
//! - [`Method`] - HTTP verbs exposed by the client
//! - [`RequestConfig`], [`RequestOptions`] and [`Request`] - what request stages mutate
//! - [`RawResponse`] and [`DeferredBody`] - transport response with a lazily read body
//! - [`Error`], [`NormalizedError`] and [`Failure`] - error handling
//! - [`StageResult`] - outcome of a response stage
//! - [`Transport`] and [`Connectivity`] - platform capabilities the client relies on

use std::pin::Pin;

mod body;
mod error;
mod method;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use body::{DeferredBody, JSON_CONTENT_TYPE, from_json, from_value, to_json};
pub use error::{Error, ErrorBody, Failure, NormalizedError, Result, StageResult};
pub use method::Method;
pub use request::{Request, RequestConfig, RequestOptions};
pub use response::RawResponse;
pub use transport::{AlwaysOnline, Connectivity, ConnectivityFlag, Transport};

/// Boxed `Send` future, as produced by pipeline stages.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
