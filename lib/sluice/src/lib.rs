//! HTTP request client with an ordered interceptor pipeline.
//!
//! Calls made through [`RequestClient`] pass three ordered stage lists held
//! by an [`InterceptorRegistry`]:
//!
//! - request stages rewrite the [`RequestConfig`] before it is sent
//! - response stages turn the [`RawResponse`] into the payload, or reject it
//! - error stages reshape every [`Failure`] before the caller sees it
//!
//! # Example
//!
//! ```ignore
//! use sluice::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = RequestClient::builder(HyperTransport::new())
//!     .host("https://api.example.com")
//!     .connectivity(ConnectivityFlag::default())
//!     .build();
//!
//! match client.get::<User>("/users/42").await {
//!     Ok(user) => println!("{user:?}"),
//!     Err(failure) if failure.is_offline() => println!("offline"),
//!     Err(failure) => println!("{failure}"),
//! }
//! ```

mod client;
mod config;
pub mod interceptors;
pub mod middleware;
pub mod prelude;
mod transport;

pub use client::{RequestClient, RequestClientBuilder};
pub use config::{
    ClientConfig, ClientConfigBuilder, DEVELOPMENT_HOST, DeploymentMode, MODE_ENV_VAR,
};
pub use interceptors::{InterceptorRegistry, ResponsePipeline};
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use sluice_core::{
    AlwaysOnline, BoxFuture, Connectivity, ConnectivityFlag, DeferredBody, Error, ErrorBody,
    Failure, JSON_CONTENT_TYPE, Method, NormalizedError, RawResponse, Request, RequestConfig,
    RequestOptions, Result, StageResult, Transport, from_json, from_value, to_json,
};
