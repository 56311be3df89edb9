//! Platform capabilities the client depends on.
//!
//! - [`Transport`] - issues a request and returns a [`RawResponse`]
//! - [`Connectivity`] - reports whether the host currently has network access
//!
//! Implement [`Transport`] directly for testing or to plug another HTTP stack.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{RawResponse, Request, Result};

/// Request-issuing primitive.
///
/// # Example
///
/// ```ignore
/// use sluice_core::{DeferredBody, RawResponse, Request, Result, Transport};
///
/// #[derive(Clone)]
/// struct Canned;
///
/// impl Transport for Canned {
///     fn execute(
///         &self,
///         _request: Request,
///     ) -> impl Future<Output = Result<RawResponse>> + Send {
///         async { Ok(RawResponse::new(200, "OK", Default::default(), DeferredBody::ready("{}"))) }
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Send the request and return the response head with an unread body.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid URL
    fn execute(&self, request: Request) -> impl Future<Output = Result<RawResponse>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<RawResponse>> + Send {
        (**self).execute(request)
    }
}

// ============================================================================
// Connectivity
// ============================================================================

/// Connectivity-status query.
pub trait Connectivity: Send + Sync {
    /// Returns `false` when the host is known to be offline.
    fn is_online(&self) -> bool;
}

impl<F> Connectivity for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_online(&self) -> bool {
        self()
    }
}

/// Connectivity that always reports online.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Shared flag updated by whoever watches the network.
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct ConnectivityFlag {
    online: Arc<AtomicBool>,
}

impl ConnectivityFlag {
    /// Create a flag with an initial state.
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    /// Record the current connectivity state.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}
