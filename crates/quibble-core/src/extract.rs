//! Custom extractors for Quibble-specific request data

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Header asserting the request originated from a trusted co-located caller.
/// Presence-only: the edge platform strips it from end-user traffic, so no
/// further authentication is applied.
pub const INTERNAL_MARKER_HEADER: &str = "x-internal-request";

// InternalCaller //
//****************//
/// Marker extractor - always succeeds, carries whether the internal-caller
/// header was present and non-empty.
#[derive(Debug, Clone)]
pub struct InternalCaller(pub bool);

impl<S> FromRequestParts<S> for InternalCaller
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let present = parts
			.headers
			.get(INTERNAL_MARKER_HEADER)
			.is_some_and(|value| !value.as_bytes().is_empty());
		Ok(InternalCaller(present))
	}
}


// vim: ts=4
