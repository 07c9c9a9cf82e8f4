use axum::Router;
use axum::http::{HeaderValue, StatusCode, header};
use axum::routing::{get, post};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::dispatch;
use crate::prelude::*;

/// All substantive traffic is a single JSON action endpoint; preflight
/// answers 204 and every response carries wide-open CORS headers.
pub fn init(state: App) -> Router {
	Router::new()
		.route("/", post(dispatch::handle).options(preflight))
		.route("/healthz", get(healthz))
		.layer(SetResponseHeaderLayer::overriding(
			header::ACCESS_CONTROL_ALLOW_ORIGIN,
			HeaderValue::from_static("*"),
		))
		.layer(SetResponseHeaderLayer::overriding(
			header::ACCESS_CONTROL_ALLOW_METHODS,
			HeaderValue::from_static("POST, GET, OPTIONS"),
		))
		.layer(SetResponseHeaderLayer::overriding(
			header::ACCESS_CONTROL_ALLOW_HEADERS,
			HeaderValue::from_static("*"),
		))
		.with_state(state)
}

async fn preflight() -> StatusCode {
	StatusCode::NO_CONTENT
}

async fn healthz() -> &'static str {
	"ok\n"
}

// vim: ts=4
