//! Request configuration.
//!
//! A [`RequestConfig`] is built by the client for every call, threaded through
//! the request stages, then paired with its absolute URL as a [`Request`] for
//! the transport.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use sluice_core::{Method, RequestConfig, RequestOptions};
//!
//! let options = RequestOptions::new()
//!     .header("Accept-Language", "fr")
//!     .timeout(Duration::from_secs(5));
//! let config = RequestConfig::new(Method::Get, None).merge(options);
//!
//! assert_eq!(config.header("Accept-Language"), Some("fr"));
//! assert!(config.body().is_none());
//! ```

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use crate::Method;

/// Per-call configuration mutated by request stages.
///
/// The method is set at construction and has no setter; stages may only touch
/// headers, body and transport options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    method: Method,
    body: Option<Bytes>,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl RequestConfig {
    /// Creates a configuration with empty headers.
    #[must_use]
    pub fn new(method: Method, body: Option<Bytes>) -> Self {
        Self {
            method,
            body,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Apply caller options on top of this configuration.
    ///
    /// Caller headers win over headers already present.
    #[must_use]
    pub fn merge(mut self, options: RequestOptions) -> Self {
        self.headers.extend(options.headers);
        if options.timeout.is_some() {
            self.timeout = options.timeout;
        }
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Serialized body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: Option<Bytes>) {
        self.body = body;
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Per-request timeout, overriding the transport default.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Set the per-request timeout.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }
}

/// Transport options supplied by the caller of a verb method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A configuration paired with its absolute URL, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: String,
    config: RequestConfig,
}

impl Request {
    /// Creates a request.
    #[must_use]
    pub fn new(url: impl Into<String>, config: RequestConfig) -> Self {
        Self {
            url: url.into(),
            config,
        }
    }

    /// Absolute URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.config.method
    }

    /// Final configuration.
    #[must_use]
    pub const fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Consume into (url, config).
    #[must_use]
    pub fn into_parts(self) -> (String, RequestConfig) {
        (self.url, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_empty_headers() {
        let config = RequestConfig::new(Method::Post, Some(Bytes::from(r#"{"a":1}"#)));

        assert_eq!(config.method(), Method::Post);
        assert!(config.headers().is_empty());
        assert_eq!(config.body(), Some(&Bytes::from(r#"{"a":1}"#)));
        assert!(config.timeout().is_none());
    }

    #[test]
    fn merge_caller_headers_override() {
        let mut config = RequestConfig::new(Method::Get, None);
        config
            .headers_mut()
            .insert("Accept".to_string(), "text/plain".to_string());

        let config = config.merge(
            RequestOptions::new()
                .header("Accept", "application/json")
                .header("X-Trace", "abc"),
        );

        assert_eq!(config.header("Accept"), Some("application/json"));
        assert_eq!(config.header("X-Trace"), Some("abc"));
    }

    #[test]
    fn merge_keeps_timeout_when_unset() {
        let mut config = RequestConfig::new(Method::Get, None);
        config.set_timeout(Some(Duration::from_secs(3)));

        let config = config.merge(RequestOptions::new());
        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));

        let config = config.merge(RequestOptions::new().timeout(Duration::from_secs(1)));
        assert_eq!(config.timeout(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn request_into_parts() {
        let config = RequestConfig::new(Method::Delete, None);
        let request = Request::new("http://localhost:6789/items/1", config.clone());

        assert_eq!(request.method(), Method::Delete);
        assert_eq!(request.url(), "http://localhost:6789/items/1");
        assert_eq!(request.into_parts().1, config);
    }
}
