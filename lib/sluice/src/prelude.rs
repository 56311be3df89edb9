//! Prelude module for convenient imports.
//!
//! ```ignore
//! use sluice::prelude::*;
//! ```

pub use crate::{
    AlwaysOnline, Connectivity, ConnectivityFlag, DeploymentMode, Error, ErrorBody, Failure,
    HyperTransport, InterceptorRegistry, Method, NormalizedError, RawResponse, RequestClient,
    RequestConfig, RequestOptions, StageResult, Transport, interceptors::defaults,
};
pub use serde::{Deserialize, Serialize};
