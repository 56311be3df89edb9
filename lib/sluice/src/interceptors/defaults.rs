//! Default stages installed by [`InterceptorRegistry::with_defaults`].
//!
//! - [`json_content_type`] - request stage forcing `Content-Type: application/json`
//! - [`classify_status`] - response stage rejecting error statuses and extracting JSON
//! - [`normalize_failure`] - error stage handling offline failures and pending bodies
//!
//! [`InterceptorRegistry::with_defaults`]: super::InterceptorRegistry::with_defaults

use std::sync::Arc;

use serde_json::Value;
use sluice_core::{
    BoxFuture, Connectivity, DeferredBody, ErrorBody, Failure, JSON_CONTENT_TYPE, NormalizedError,
    RawResponse, RequestConfig, StageResult, from_json,
};
use tracing::debug;

/// Header set by [`json_content_type`].
pub const CONTENT_TYPE: &str = "Content-Type";

/// Status text of the failure produced when the host is offline.
pub const NO_INTERNET_CONNECTION: &str = "No internet connection";

/// Set `Content-Type: application/json`, replacing any existing content type
/// and keeping every other header.
#[must_use]
pub fn json_content_type(mut config: RequestConfig) -> RequestConfig {
    let headers = config.headers_mut();
    headers.retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE));
    headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
    config
}

/// Reject 401, 403, 404 and every non-2xx response; resolve anything else
/// with its JSON body.
///
/// The rejection carries the response's own status text, or a fallback for
/// its status class, and the unread body as [`ErrorBody::Pending`].
pub async fn classify_status(response: RawResponse) -> StageResult<Value> {
    let Some(fallback) = rejection_text(response.status(), response.ok()) else {
        return read_json(response.into_body()).await.map_err(Failure::from);
    };

    let status_text = match response.status_text() {
        "" => fallback.to_string(),
        text => text.to_string(),
    };

    Err(NormalizedError {
        status: response.status(),
        status_text,
        response: Some(ErrorBody::Pending(response.into_body())),
    }
    .into())
}

// Specific statuses first: their fallback text wins over the generic one.
fn rejection_text(status: u16, ok: bool) -> Option<&'static str> {
    match status {
        401 => Some("Unauthorized"),
        403 => Some("Forbidden"),
        404 => Some("Not Found"),
        _ if !ok => Some("Request failed"),
        _ => None,
    }
}

/// Build the default error stage.
///
/// - a connection failure while `connectivity` reports offline becomes
///   `{ status: 0, status_text: "No internet connection" }`
/// - a normalized failure with a pending body gets that body read and resolved
/// - anything else is kept unchanged
///
/// The stage always rejects, so stages registered after it never run.
pub fn normalize_failure(
    connectivity: Arc<dyn Connectivity>,
) -> impl Fn(Failure) -> BoxFuture<'static, StageResult<Failure>> + Send + Sync + 'static {
    move |failure| {
        let connectivity = Arc::clone(&connectivity);
        Box::pin(async move { Err(normalize(failure, connectivity).await) })
    }
}

async fn normalize(failure: Failure, connectivity: Arc<dyn Connectivity>) -> Failure {
    match failure {
        Failure::Transport(err) if err.is_connection() && !connectivity.is_online() => {
            debug!(error = %err, "connection failed while offline");
            NormalizedError::new(0, NO_INTERNET_CONNECTION).into()
        }
        Failure::Status(NormalizedError {
            status,
            status_text,
            response: Some(ErrorBody::Pending(body)),
        }) => {
            let response = match read_json(body).await {
                Ok(value) => Some(ErrorBody::Resolved(value)),
                Err(err) => {
                    debug!(status, error = %err, "error body is not readable as JSON");
                    None
                }
            };
            NormalizedError {
                status,
                status_text,
                response,
            }
            .into()
        }
        other => other,
    }
}

// An empty body reads as `null`.
async fn read_json(body: DeferredBody) -> sluice_core::Result<Value> {
    let bytes = body.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    from_json(&bytes)
}
