//! Core infrastructure for the Quibble dispatcher.
//!
//! Contains the shared outbound HTTP client wrapper and the custom axum
//! extractor for the internal-caller marker header.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod extract;
pub mod prelude;
pub mod request;

pub use extract::{INTERNAL_MARKER_HEADER, InternalCaller};
pub use request::Request;

// vim: ts=4
