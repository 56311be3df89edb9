//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use sluice_core::prelude::*;
//! ```

pub use crate::{
    Connectivity, DeferredBody, Error, ErrorBody, Failure, Method, NormalizedError, RawResponse,
    Request, RequestConfig, RequestOptions, Result, StageResult, Transport, from_json, to_json,
};
