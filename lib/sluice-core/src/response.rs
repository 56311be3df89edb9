//! Transport-level response.
//!
//! [`RawResponse`] exposes the status line and headers right away and keeps
//! the body unread until a stage asks for it.
//!
//! # Example
//!
//! ```ignore
//! let user: User = response.json().await?;
//! ```

use std::collections::HashMap;

use crate::{DeferredBody, Result};

/// HTTP response as returned by a [`Transport`](crate::Transport).
#[derive(Debug)]
pub struct RawResponse {
    status: u16,
    status_text: String,
    headers: HashMap<String, String>,
    body: DeferredBody,
}

impl RawResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: HashMap<String, String>,
        body: DeferredBody,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase sent with the status, possibly empty.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Consume into the unread body.
    #[must_use]
    pub fn into_body(self) -> DeferredBody {
        self.body
    }

    /// Read the body and decode it as JSON.
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        self.body.json().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_basic() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = RawResponse::new(200, "OK", headers, DeferredBody::ready(r#"{"id":1}"#));

        assert_eq!(response.status(), 200);
        assert_eq!(response.status_text(), "OK");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.ok());
    }

    #[test]
    fn response_ok_flag() {
        let ok = |status| RawResponse::new(status, "", HashMap::new(), DeferredBody::ready(""));

        assert!(ok(204).ok());
        assert!(!ok(199).ok());
        assert!(!ok(301).ok());
        assert!(!ok(404).ok());
        assert!(!ok(500).ok());
    }

    #[tokio::test]
    async fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            id: u64,
            name: String,
        }

        let body = DeferredBody::ready(r#"{"id":1,"name":"test"}"#);
        let response = RawResponse::new(200, "OK", HashMap::new(), body);

        let user: User = response.json().await.expect("deserialize");
        assert_eq!(
            user,
            User {
                id: 1,
                name: "test".to_string()
            }
        );
    }
}
