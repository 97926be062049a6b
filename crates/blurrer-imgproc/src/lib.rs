#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// filter configuration module.
pub mod config;

/// Error types for the filtering operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// border padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// high level filtering pipeline.
pub mod pipeline;

/// float to 8-bit conversion module.
pub mod quantize;

pub use crate::error::FilterError;
