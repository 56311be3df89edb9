//! Wire exchange logging.
//!
//! Each exchange runs inside a `sluice_exchange` span. The span's `status`
//! and `elapsed_ms` fields are filled in once the exchange settles, and one
//! event reports how it ended.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, Span, debug, field, info, info_span, warn};

use crate::{Error, RawResponse, Request, Result};

/// Headers whose value never reaches the logs.
const REDACTED_HEADERS: [&str; 3] = ["authorization", "cookie", "proxy-authorization"];

/// Layer that logs transport exchanges.
///
/// # Example
///
/// ```ignore
/// use sluice::HyperTransport;
/// use sluice::middleware::LoggingLayer;
///
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// How much of an exchange is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Also log request headers (credentials redacted) and body size.
    Debug,
    /// Only log how each exchange ended.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Log outcomes only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log outcomes and outgoing request details.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = RawResponse, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = RawResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let span = info_span!(
            "sluice_exchange",
            method = %request.method(),
            url = request.url(),
            status = field::Empty,
            elapsed_ms = field::Empty,
        );

        if self.level == LogLevel::Debug {
            let config = request.config();
            span.in_scope(|| {
                debug!(
                    headers = ?redacted(config.headers()),
                    body_len = config.body().map_or(0, bytes::Bytes::len),
                    "sending request"
                );
            });
        }

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;

                let current = Span::current();
                current.record(
                    "elapsed_ms",
                    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                );
                if let Ok(response) = &result {
                    current.record("status", response.status());
                }
                Outcome::of(&result).log();

                result
            }
            .instrument(span),
        )
    }
}

/// How an exchange ended, as far as the wire is concerned.
#[derive(Debug)]
enum Outcome<'a> {
    Success,
    Rejected { status: u16, status_text: &'a str },
    TimedOut,
    Unreachable(&'a Error),
    Failed(&'a Error),
}

impl<'a> Outcome<'a> {
    fn of(result: &'a Result<RawResponse>) -> Self {
        match result {
            Ok(response) if response.ok() => Self::Success,
            Ok(response) => Self::Rejected {
                status: response.status(),
                status_text: response.status_text(),
            },
            Err(Error::Timeout) => Self::TimedOut,
            Err(err) if err.is_connection() => Self::Unreachable(err),
            Err(err) => Self::Failed(err),
        }
    }

    fn log(&self) {
        match self {
            Self::Success => info!("exchange completed"),
            Self::Rejected {
                status,
                status_text,
            } => warn!(status, status_text, "server answered with an error status"),
            Self::TimedOut => warn!("no response before the timeout"),
            // Offline hosts land here on every call; the error stages report it
            Self::Unreachable(err) => debug!(error = %err, "server unreachable"),
            Self::Failed(err) => warn!(error = %err, "exchange failed"),
        }
    }
}

fn redacted(headers: &HashMap<String, String>) -> Vec<(&str, &str)> {
    let mut entries: Vec<_> = headers
        .iter()
        .map(|(name, value)| {
            let sensitive = REDACTED_HEADERS
                .iter()
                .any(|hidden| name.eq_ignore_ascii_case(hidden));
            (
                name.as_str(),
                if sensitive { "<redacted>" } else { value.as_str() },
            )
        })
        .collect();
    entries.sort_unstable();
    entries
}

#[cfg(test)]
mod tests {
    use sluice_core::{DeferredBody, Method, RequestConfig};
    use tower::ServiceExt;

    use super::*;

    fn response(status: u16, status_text: &str) -> RawResponse {
        RawResponse::new(
            status,
            status_text,
            HashMap::new(),
            DeferredBody::ready(""),
        )
    }

    #[test]
    fn credentials_are_redacted() {
        let headers = HashMap::from([
            ("Authorization".to_string(), "Bearer secret".to_string()),
            ("cookie".to_string(), "session=1".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]);

        assert_eq!(
            redacted(&headers),
            vec![
                ("Authorization", "<redacted>"),
                ("Content-Type", "application/json"),
                ("cookie", "<redacted>"),
            ]
        );
    }

    #[test]
    fn outcome_classification() {
        let ok = Ok(response(204, ""));
        assert!(matches!(Outcome::of(&ok), Outcome::Success));

        let missing = Ok(response(404, "Not Found"));
        assert!(matches!(
            Outcome::of(&missing),
            Outcome::Rejected {
                status: 404,
                status_text: "Not Found"
            }
        ));

        let timeout = Err(Error::Timeout);
        assert!(matches!(Outcome::of(&timeout), Outcome::TimedOut));

        let refused = Err(Error::connection("refused"));
        assert!(matches!(Outcome::of(&refused), Outcome::Unreachable(_)));

        let tls = Err(Error::tls("bad certificate"));
        assert!(matches!(Outcome::of(&tls), Outcome::Failed(_)));
    }

    #[tokio::test]
    async fn logging_passes_response_through() {
        let inner = tower::service_fn(|_request: Request| async {
            Ok::<_, Error>(response(418, "I'm a teapot"))
        });
        let service = LoggingLayer::debug().layer(inner);

        let request = Request::new(
            "http://localhost/teapot",
            RequestConfig::new(Method::Get, None),
        );
        let response = service.oneshot(request).await.expect("response");

        assert_eq!(response.status(), 418);
        assert_eq!(response.status_text(), "I'm a teapot");
    }

    #[tokio::test]
    async fn logging_passes_error_through() {
        let inner = tower::service_fn(|_request: Request| async {
            Err::<RawResponse, _>(Error::connection("refused"))
        });
        let service = LoggingLayer::new().layer(inner);

        let request = Request::new("http://127.0.0.1:1/", RequestConfig::new(Method::Get, None));
        let err = service.oneshot(request).await.expect_err("error");

        assert!(err.is_connection());
    }
}
