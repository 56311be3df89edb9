//! Body serialization utilities.

use std::fmt;

use bytes::Bytes;

use crate::{BoxFuture, Result};

/// MIME type of every body the client sends.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use sluice_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Item { a: u32 }
///
/// let bytes = to_json(&Item { a: 1 }).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"a":1}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the field that failed
/// (e.g. `user.address.city`).
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Convert an already-parsed JSON value into a typed value, keeping the path
/// of the failing field.
pub fn from_value<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// A response body that has not been read yet.
///
/// The body is produced by a future handed over by the transport; it is read
/// at most once, by whichever stage needs the payload.
pub struct DeferredBody {
    inner: BoxFuture<'static, Result<Bytes>>,
}

impl DeferredBody {
    /// Wrap a future that yields the body bytes.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(future),
        }
    }

    /// A body whose bytes are already in memory.
    pub fn ready(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::new(async move { Ok(bytes) })
    }

    /// Read the raw body bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        self.inner.await
    }

    /// Read the body and decode it as JSON.
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let bytes = self.inner.await?;
        from_json(&bytes)
    }
}

impl fmt::Debug for DeferredBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredBody").finish_non_exhaustive()
    }
}
