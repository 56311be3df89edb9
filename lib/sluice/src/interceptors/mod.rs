//! Interceptor registry.
//!
//! An [`InterceptorRegistry`] holds three ordered pipelines:
//!
//! | Pipeline | Stage signature | Execution |
//! |----------|-----------------|-----------|
//! | request  | `Fn(RequestConfig) -> RequestConfig` | synchronous left fold |
//! | response | `Fn(I) -> Future<Output = StageResult<O>>` | sequential await, stops on `Err` |
//! | error    | `Fn(Failure) -> Future<Output = StageResult<Failure>>` | sequential await, stops on `Err` |
//!
//! Registration order is execution order. Stages are appended while the
//! registry is built; once it is handed to a client it is only read.
//!
//! # Example
//!
//! ```ignore
//! use sluice::interceptors::{InterceptorRegistry, defaults};
//!
//! let registry = InterceptorRegistry::new()
//!     .add_request_interceptor(defaults::json_content_type)
//!     .add_request_interceptor(|mut config| {
//!         config.headers_mut().insert("X-Client".into(), "sluice".into());
//!         config
//!     })
//!     .add_response_interceptor(defaults::classify_status)
//!     .add_error_interceptor(defaults::normalize_failure(Arc::new(AlwaysOnline)));
//! ```

pub mod defaults;
mod pipeline;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sluice_core::{BoxFuture, Connectivity, Failure, RawResponse, RequestConfig, StageResult};
use tracing::trace;

pub use pipeline::ResponsePipeline;

type RequestStage = Arc<dyn Fn(RequestConfig) -> RequestConfig + Send + Sync>;
type ErrorStage = Arc<dyn Fn(Failure) -> BoxFuture<'static, StageResult<Failure>> + Send + Sync>;

/// Ordered request, response and error stages.
///
/// `R` is the output type of the response pipeline. The client consumes a
/// registry whose response pipeline ends in a JSON [`Value`].
pub struct InterceptorRegistry<R = Value> {
    request: Vec<RequestStage>,
    response: ResponsePipeline<RawResponse, R>,
    error: Vec<ErrorStage>,
}

impl<R> Clone for InterceptorRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            response: self.response.clone(),
            error: self.error.clone(),
        }
    }
}

impl<R> fmt::Debug for InterceptorRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("request_stages", &self.request.len())
            .field("response_stages", &self.response.len())
            .field("error_stages", &self.error.len())
            .finish()
    }
}

impl InterceptorRegistry<RawResponse> {
    /// A registry without any stage.
    ///
    /// Its response pipeline returns the [`RawResponse`] unchanged; add a stage
    /// producing a [`Value`] (such as [`defaults::classify_status`]) before
    /// handing it to a client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request: Vec::new(),
            response: ResponsePipeline::new(),
            error: Vec::new(),
        }
    }
}

impl Default for InterceptorRegistry<RawResponse> {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptorRegistry<Value> {
    /// A registry with the default stages:
    /// [`defaults::json_content_type`], [`defaults::classify_status`] and
    /// [`defaults::normalize_failure`] reading `connectivity`.
    #[must_use]
    pub fn with_defaults(connectivity: impl Connectivity + 'static) -> Self {
        Self::with_shared_defaults(Arc::new(connectivity))
    }

    /// Same as [`InterceptorRegistry::with_defaults`], for a connectivity
    /// source that is already shared.
    #[must_use]
    pub fn with_shared_defaults(connectivity: Arc<dyn Connectivity>) -> Self {
        InterceptorRegistry::new()
            .add_request_interceptor(defaults::json_content_type)
            .add_response_interceptor(defaults::classify_status)
            .add_error_interceptor(defaults::normalize_failure(connectivity))
    }
}

impl<R: Send + 'static> InterceptorRegistry<R> {
    /// Append a request stage.
    #[must_use]
    pub fn add_request_interceptor<F>(mut self, stage: F) -> Self
    where
        F: Fn(RequestConfig) -> RequestConfig + Send + Sync + 'static,
    {
        self.request.push(Arc::new(stage));
        self
    }

    /// Append a response stage consuming the current pipeline output.
    ///
    /// The stage may change the output type; the registry's type follows.
    #[must_use]
    pub fn add_response_interceptor<N, F, Fut>(self, stage: F) -> InterceptorRegistry<N>
    where
        N: Send + 'static,
        F: Fn(R) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StageResult<N>> + Send + 'static,
    {
        InterceptorRegistry {
            request: self.request,
            response: self.response.then(stage),
            error: self.error,
        }
    }

    /// Append an error stage.
    ///
    /// `Ok` hands the failure to the next stage; `Err` rejects it and the
    /// remaining stages are skipped.
    #[must_use]
    pub fn add_error_interceptor<F, Fut>(mut self, stage: F) -> Self
    where
        F: Fn(Failure) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StageResult<Failure>> + Send + 'static,
    {
        self.error.push(Arc::new(
            move |failure: Failure| -> BoxFuture<'static, StageResult<Failure>> {
                Box::pin(stage(failure))
            },
        ));
        self
    }

    /// Number of request stages.
    #[must_use]
    pub fn request_stage_count(&self) -> usize {
        self.request.len()
    }

    /// Number of response stages.
    #[must_use]
    pub const fn response_stage_count(&self) -> usize {
        self.response.len()
    }

    /// Number of error stages.
    #[must_use]
    pub fn error_stage_count(&self) -> usize {
        self.error.len()
    }

    /// Fold `config` through every request stage in order.
    ///
    /// A panicking stage stops the fold; later stages do not run.
    #[must_use]
    pub fn execute_request_interceptors(&self, config: RequestConfig) -> RequestConfig {
        trace!(stages = self.request.len(), "running request stages");
        self.request.iter().fold(config, |config, stage| stage(config))
    }

    /// Await every response stage in order.
    ///
    /// The first `Err` returned by a stage is returned as is and the
    /// remaining stages are skipped.
    pub async fn execute_response_interceptors(&self, response: RawResponse) -> StageResult<R> {
        trace!(stages = self.response.len(), "running response stages");
        self.response.run(response).await
    }

    /// Await every error stage in order, each receiving the previous output.
    ///
    /// The first stage returning `Err` ends the fold with that failure.
    /// Either way the caller ends up with a [`Failure`].
    pub async fn execute_error_interceptors(&self, failure: Failure) -> Failure {
        trace!(stages = self.error.len(), "running error stages");
        let mut failure = failure;
        for (index, stage) in self.error.iter().enumerate() {
            match stage(failure).await {
                Ok(next) => failure = next,
                Err(rejected) => {
                    trace!(stage = index, "error stage rejected");
                    return rejected;
                }
            }
        }
        failure
    }
}
