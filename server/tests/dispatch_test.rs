//! Router-level tests for the action dispatch endpoint.
//!
//! Every scenario here is fully offline: the chosen payloads stop at a guard
//! or a configuration error before any SMTP or HTTP provider call.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use quibble::AppState;
use quibble::routes;
use quibble_core::INTERNAL_MARKER_HEADER;

fn router() -> Router {
	routes::init(Arc::new(AppState::new()))
}

fn action_request(body: serde_json::Value, internal: bool) -> Request<Body> {
	let mut builder = Request::builder()
		.method("POST")
		.uri("/")
		.header(header::CONTENT_TYPE, "application/json");
	if internal {
		builder = builder.header(INTERNAL_MARKER_HEADER, "true");
	}
	builder.body(Body::from(body.to_string())).unwrap()
}

async fn call(request: Request<Body>) -> (StatusCode, serde_json::Value) {
	let response = router().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let json = serde_json::from_slice(&bytes).unwrap();
	(status, json)
}

#[tokio::test]
async fn test_non_internal_caller_is_forbidden() {
	let body = serde_json::json!({ "action": "postSubmit", "data": {} });
	let (status, json) = call(action_request(body, false)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["code"], serde_json::json!(1403));
}

#[tokio::test]
async fn test_unknown_action_fails() {
	let body = serde_json::json!({ "action": "selfDestruct", "data": {} });
	let (_, json) = call(action_request(body, true)).await;
	assert_eq!(json["code"], serde_json::json!(1000));
	assert_eq!(json["message"], serde_json::json!("unknown operation"));
}

#[tokio::test]
async fn test_preflight_answers_204_with_cors() {
	let request = Request::builder().method("OPTIONS").uri("/").body(Body::empty()).unwrap();
	let response = router().oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::NO_CONTENT);
	assert_eq!(
		response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
		Some(b"*".as_slice())
	);
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_responses_carry_cors_and_json_content_type() {
	let body = serde_json::json!({ "action": "postSubmit", "data": {} });
	let response = router().oneshot(action_request(body, false)).await.unwrap();
	assert_eq!(
		response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
		Some(b"*".as_slice())
	);
	assert_eq!(
		response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
		Some(b"application/json; charset=utf-8".as_slice())
	);
}

#[tokio::test]
async fn test_email_test_requires_admin() {
	let body = serde_json::json!({
		"action": "emailTest",
		"data": { "config": {}, "isAdmin": false },
	});
	let (_, json) = call(action_request(body, true)).await;
	assert_eq!(json["code"], serde_json::json!(1024));
}

#[tokio::test]
async fn test_email_test_reports_missing_credentials() {
	let body = serde_json::json!({
		"action": "emailTest",
		"data": { "config": {}, "isAdmin": true },
	});
	let (_, json) = call(action_request(body, true)).await;
	assert_eq!(json["code"], serde_json::json!(1000));
	let message = json["message"].as_str().unwrap_or_default();
	assert!(message.contains("SMTP_USER"), "unexpected message: {}", message);
}

#[tokio::test]
async fn test_qq_avatar_rejects_non_qq_mail() {
	let body = serde_json::json!({
		"action": "getQQAvatar",
		"data": { "mail": "not-a-qq@example.com" },
	});
	let (_, json) = call(action_request(body, true)).await;
	assert_eq!(json["code"], serde_json::json!(1000));
}

#[tokio::test]
async fn test_post_submit_resolves_avatar_and_omits_undetermined_spam() {
	let body = serde_json::json!({
		"action": "postSubmit",
		"data": {
			"comment": {
				"nick": "Bob",
				"mail": "bob@example.com",
				"comment": "<p>hello</p>",
				"href": "https://x/y",
				"_id": "abc",
			},
			"config": {},
		},
	});
	let (status, json) = call(action_request(body, true)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["code"], serde_json::json!(0));
	assert!(json.get("isSpam").is_none(), "undetermined verdict must be omitted");

	let avatar = json["avatar"].as_str().unwrap_or_default();
	assert!(avatar.starts_with("https://cravatar.cn/avatar/"), "unexpected avatar: {}", avatar);
	assert!(avatar.ends_with("?d=mp"));
}

#[tokio::test]
async fn test_post_submit_owner_comment_short_circuits_not_spam() {
	let body = serde_json::json!({
		"action": "postSubmit",
		"data": {
			"comment": { "nick": "Owner", "mail": "Owner@Site.com " },
			"config": { "BLOGGER_EMAIL": "owner@site.com" },
		},
	});
	let (_, json) = call(action_request(body, true)).await;
	assert_eq!(json["code"], serde_json::json!(0));
	assert_eq!(json["isSpam"], serde_json::json!(false));
}

#[tokio::test]
async fn test_post_submit_honors_preflagged_spam() {
	let body = serde_json::json!({
		"action": "postSubmit",
		"data": {
			"comment": { "nick": "Spammer", "isSpam": true },
			"config": { "NOTIFY_SPAM": "false" },
		},
	});
	let (_, json) = call(action_request(body, true)).await;
	assert_eq!(json["code"], serde_json::json!(0));
	assert_eq!(json["isSpam"], serde_json::json!(true));
}

#[tokio::test]
async fn test_healthz() {
	let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
	let response = router().oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	assert_eq!(&bytes[..], b"ok\n");
}

// vim: ts=4
