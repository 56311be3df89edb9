//! Request client.
//!
//! [`RequestClient`] exposes `get`/`post`/`put`/`delete`. Every verb goes
//! through the same steps:
//!
//! 1. build a [`RequestConfig`] (JSON body for POST/PUT, caller options on top)
//! 2. run the request stages
//! 3. send it to `host + path` through the [`Transport`]
//! 4. run the response stages and decode the resulting JSON into `T`
//! 5. on any failure, run the error stages and return their output
//!
//! # Example
//!
//! ```ignore
//! use sluice::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct User { id: u64, name: String }
//!
//! let client = RequestClient::builder(HyperTransport::new())
//!     .mode(DeploymentMode::Development)
//!     .build();
//!
//! let user: User = client.get("/users/42").await?;
//! ```

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sluice_core::{AlwaysOnline, Connectivity, Transport, from_value, to_json};
use tracing::{Instrument, debug, debug_span};

use crate::{
    Failure, Method, Request, RequestConfig, RequestOptions,
    config::DeploymentMode,
    interceptors::InterceptorRegistry,
};

/// HTTP client running every call through an [`InterceptorRegistry`].
#[derive(Debug)]
pub struct RequestClient<T> {
    transport: T,
    registry: Arc<InterceptorRegistry>,
    host: Arc<str>,
}

impl<T: Clone> Clone for RequestClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            registry: Arc::clone(&self.registry),
            host: Arc::clone(&self.host),
        }
    }
}

impl<T> RequestClient<T> {
    /// Create a client from its parts.
    pub fn new(transport: T, registry: InterceptorRegistry, host: impl Into<String>) -> Self {
        Self {
            transport,
            registry: Arc::new(registry),
            host: Arc::from(host.into()),
        }
    }

    /// Create a client builder around `transport`.
    pub fn builder(transport: T) -> RequestClientBuilder<T> {
        RequestClientBuilder::new(transport)
    }

    /// Host prefix prepended to every path.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The stages every call runs through.
    #[must_use]
    pub fn registry(&self) -> &InterceptorRegistry {
        &self.registry
    }

    /// Get a reference to the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> RequestClient<T> {
    /// Issue a GET request.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, Failure> {
        self.get_with(path, RequestOptions::default()).await
    }

    /// Issue a GET request with caller options.
    pub async fn get_with<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<R, Failure> {
        self.request(path, Method::Get, None, options).await
    }

    /// Issue a POST request with a JSON body.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Failure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.post_with(path, Some(body), RequestOptions::default())
            .await
    }

    /// Issue a POST request with an optional JSON body and caller options.
    pub async fn post_with<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<R, Failure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.serialize(body).await?;
        self.request(path, Method::Post, body, options).await
    }

    /// Issue a PUT request with a JSON body.
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, Failure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.put_with(path, Some(body), RequestOptions::default())
            .await
    }

    /// Issue a PUT request with an optional JSON body and caller options.
    pub async fn put_with<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<R, Failure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.serialize(body).await?;
        self.request(path, Method::Put, body, options).await
    }

    /// Issue a DELETE request.
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, Failure> {
        self.delete_with(path, RequestOptions::default()).await
    }

    /// Issue a DELETE request with caller options.
    pub async fn delete_with<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<R, Failure> {
        self.request(path, Method::Delete, None, options).await
    }

    /// Run one call through the request, response and error stages.
    ///
    /// `body` is sent only for POST and PUT. Every failure, whatever its
    /// origin, leaves through the error stages.
    pub async fn request<R: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<Bytes>,
        options: RequestOptions,
    ) -> Result<R, Failure> {
        let span = debug_span!("sluice_request", %method, path);

        async move {
            let body = body.filter(|_| method.sends_body());
            let config = RequestConfig::new(method, body).merge(options);
            let config = self.registry.execute_request_interceptors(config);

            let url = format!("{}{path}", self.host);
            let outcome = match self.transport.execute(Request::new(url, config)).await {
                Ok(response) => self
                    .registry
                    .execute_response_interceptors(response)
                    .await
                    .and_then(|value| from_value(value).map_err(Failure::from)),
                Err(err) => Err(Failure::from(err)),
            };

            match outcome {
                Ok(value) => Ok(value),
                Err(failure) => Err(self.reject(failure).await),
            }
        }
        .instrument(span)
        .await
    }

    async fn serialize<B>(&self, body: Option<&B>) -> Result<Option<Bytes>, Failure>
    where
        B: Serialize + ?Sized,
    {
        match body.map(to_json).transpose() {
            Ok(body) => Ok(body),
            Err(err) => Err(self.reject(err.into()).await),
        }
    }

    async fn reject(&self, failure: Failure) -> Failure {
        debug!(error = %failure, "running error stages");
        self.registry.execute_error_interceptors(failure).await
    }
}

/// Builder for [`RequestClient`].
///
/// Without an explicit registry, the client gets
/// [`InterceptorRegistry::with_defaults`] reading the configured connectivity
/// (always online unless set). Without an explicit host, the host comes from
/// [`DeploymentMode::from_env`].
///
/// [`HyperTransport`](crate::HyperTransport) only accepts absolute URLs. In
/// production mode the host prefix is empty, so set one with
/// [`RequestClientBuilder::host`].
pub struct RequestClientBuilder<T> {
    transport: T,
    registry: Option<InterceptorRegistry>,
    connectivity: Option<Arc<dyn Connectivity>>,
    host: Option<String>,
}

impl<T> std::fmt::Debug for RequestClientBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClientBuilder")
            .field("registry", &self.registry)
            .field("has_connectivity", &self.connectivity.is_some())
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl<T> RequestClientBuilder<T> {
    /// Create a builder around `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            registry: None,
            connectivity: None,
            host: None,
        }
    }

    /// Use `registry` instead of the default stages.
    #[must_use]
    pub fn registry(mut self, registry: InterceptorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Connectivity read by the default error stage.
    ///
    /// Ignored when a registry is provided.
    #[must_use]
    pub fn connectivity(mut self, connectivity: impl Connectivity + 'static) -> Self {
        self.connectivity = Some(Arc::new(connectivity));
        self
    }

    /// Set the host prefix.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the host prefix from a deployment mode.
    #[must_use]
    pub fn mode(self, mode: DeploymentMode) -> Self {
        self.host(mode.host())
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> RequestClient<T> {
        let registry = self.registry.unwrap_or_else(|| {
            let connectivity = self
                .connectivity
                .unwrap_or_else(|| Arc::new(AlwaysOnline));
            InterceptorRegistry::with_shared_defaults(connectivity)
        });
        let host = self
            .host
            .unwrap_or_else(|| DeploymentMode::from_env().host().to_string());

        RequestClient::new(self.transport, registry, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HyperTransport;

    #[test]
    fn builder_mode_sets_host() {
        let client = RequestClient::builder(HyperTransport::new())
            .mode(DeploymentMode::Development)
            .build();
        assert_eq!(client.host(), "http://localhost:6789");

        let client = RequestClient::builder(HyperTransport::new())
            .host("https://api.example.com")
            .build();
        assert_eq!(client.host(), "https://api.example.com");
    }

    #[test]
    fn builder_installs_default_stages() {
        let client = RequestClient::builder(HyperTransport::new())
            .connectivity(|| true)
            .host("")
            .build();

        assert_eq!(client.registry().request_stage_count(), 1);
        assert_eq!(client.registry().response_stage_count(), 1);
        assert_eq!(client.registry().error_stage_count(), 1);
    }

    #[tokio::test]
    async fn production_mode_needs_an_explicit_host() {
        let client = RequestClient::builder(HyperTransport::new())
            .mode(DeploymentMode::Production)
            .build();
        assert_eq!(client.host(), "");

        let failure = client
            .get::<serde_json::Value>("/api/status")
            .await
            .expect_err("relative URL");
        assert!(matches!(
            failure,
            Failure::Transport(sluice_core::Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn client_is_clone() {
        let client = RequestClient::builder(HyperTransport::new()).host("").build();
        let cloned = client.clone();
        assert_eq!(cloned.host(), client.host());
    }
}
