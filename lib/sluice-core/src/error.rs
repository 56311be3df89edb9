//! Error types for sluice.
//!
//! Two layers of errors exist:
//! - [`Error`] - what went wrong at the transport or codec level
//! - [`Failure`] - what the error pipeline carries and what callers receive:
//!   either a [`NormalizedError`] or a pass-through [`Error`]

use derive_more::{Display, Error, From};

use crate::DeferredBody;

// ============================================================================
// Transport Error
// ============================================================================

/// Transport and codec level error.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The request never got a response (DNS, refused connection, reset...).
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if the request failed before any response arrived.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Normalized Error
// ============================================================================

/// Body attached to a [`NormalizedError`].
#[derive(Debug)]
pub enum ErrorBody {
    /// The response body has not been read yet.
    Pending(DeferredBody),
    /// The response body, decoded as JSON.
    Resolved(serde_json::Value),
}

impl ErrorBody {
    /// The decoded body, if it has been resolved.
    #[must_use]
    pub const fn resolved(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Pending(_) => None,
        }
    }

    /// Returns `true` if the body still has to be read.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Canonical failure shape: status, status text and an optional body.
///
/// A `status` of `0` means the request never reached the server.
#[derive(Debug, Display, Error)]
#[display("{status_text} (status {status})")]
pub struct NormalizedError {
    /// HTTP status code, `0` for connectivity failures.
    pub status: u16,
    /// Status text, or a fallback message for the status class.
    pub status_text: String,
    /// Response body, if one was attached.
    #[error(not(source))]
    pub response: Option<ErrorBody>,
}

impl NormalizedError {
    /// Create an error without a body.
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            response: None,
        }
    }

    /// Attach a body.
    #[must_use]
    pub fn with_response(mut self, response: ErrorBody) -> Self {
        self.response = Some(response);
        self
    }

    /// Returns `true` for a 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns `true` for a 403.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// Returns `true` for a 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Returns `true` for a 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Returns `true` for a 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Returns `true` when the request never reached the server.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        self.status == 0
    }

    /// Decode a resolved body into a typed value.
    ///
    /// Returns `None` if there is no body or it has not been resolved yet.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.response
            .as_ref()
            .and_then(ErrorBody::resolved)
            .map(|value| crate::from_value(value.clone()))
    }
}

// ============================================================================
// Failure
// ============================================================================

/// Value carried through the error pipeline and returned to callers.
///
/// Stages normalize what they recognize into [`Failure::Status`]; anything
/// else is forwarded as [`Failure::Transport`].
#[derive(Debug, Display, Error, From)]
pub enum Failure {
    /// A normalized failure.
    #[display("{_0}")]
    Status(NormalizedError),
    /// A transport or codec error no stage reshaped.
    #[display("{_0}")]
    Transport(Error),
}

/// Outcome of a response stage: the value for the next stage, or a failure
/// that skips the remaining stages.
pub type StageResult<T> = std::result::Result<T, Failure>;

impl Failure {
    /// Status code of a normalized failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(err) => Some(err.status),
            Self::Transport(_) => None,
        }
    }

    /// Status text of a normalized failure.
    #[must_use]
    pub fn status_text(&self) -> Option<&str> {
        match self {
            Self::Status(err) => Some(err.status_text.as_str()),
            Self::Transport(_) => None,
        }
    }

    /// The normalized error, if any.
    #[must_use]
    pub const fn as_normalized(&self) -> Option<&NormalizedError> {
        match self {
            Self::Status(err) => Some(err),
            Self::Transport(_) => None,
        }
    }

    /// Returns `true` for a connectivity failure (`status == 0`).
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Status(err) if err.is_offline())
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn error_display() {
        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_predicates() {
        check!(Error::Timeout.is_timeout());
        check!(Error::connection("failed").is_connection());
        check!(!Error::Timeout.is_connection());
    }

    #[test]
    fn normalized_error_status_classes() {
        let err = NormalizedError::new(404, "Not Found");
        check!(err.is_not_found());
        check!(err.is_client_error());
        check!(!err.is_server_error());
        check!(NormalizedError::new(401, "Unauthorized").is_unauthorized());
        check!(NormalizedError::new(403, "Forbidden").is_forbidden());
        check!(NormalizedError::new(503, "Unavailable").is_server_error());
        check!(NormalizedError::new(0, "No internet connection").is_offline());
        assert_eq!(err.to_string(), "Not Found (status 404)");
    }

    #[test]
    fn decode_resolved_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            error: String,
        }

        let err = NormalizedError::new(404, "Not Found").with_response(ErrorBody::Resolved(
            serde_json::json!({ "error": "not found" }),
        ));

        let_assert!(Some(Ok(decoded)) = err.decode_body::<ApiError>());
        assert_eq!(
            decoded,
            ApiError {
                error: "not found".to_string()
            }
        );
    }

    #[test]
    fn pending_body_is_not_decoded() {
        let err = NormalizedError::new(500, "Request failed")
            .with_response(ErrorBody::Pending(DeferredBody::ready("{}")));
        check!(err.decode_body::<serde_json::Value>().is_none());
        check!(err.response.as_ref().is_some_and(ErrorBody::is_pending));
    }

    #[test]
    fn failure_accessors() {
        let failure = Failure::from(NormalizedError::new(0, "No internet connection"));
        check!(failure.is_offline());
        check!(failure.status() == Some(0));
        check!(failure.status_text() == Some("No internet connection"));

        let failure = Failure::from(Error::Timeout);
        check!(failure.status().is_none());
        check!(failure.as_normalized().is_none());
        check!(!failure.is_offline());
    }
}
