//! Tower middleware layers for the hyper transport.
//!
//! Interceptor stages shape what a call means; these layers wrap the wire
//! exchange itself, below the stages. Layers are applied in order: first
//! added = outermost.
//!
//! - [`LoggingLayer`] - Logs each exchange using `tracing`
//!
//! # Example
//!
//! ```ignore
//! use sluice::HyperTransport;
//! use sluice::middleware::LoggingLayer;
//!
//! let transport = HyperTransport::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
