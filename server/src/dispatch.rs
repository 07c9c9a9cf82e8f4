//! Action dispatch
//!
//! Routes an inbound `{ action, data }` request to its handler. Only the
//! structural checks (internal-caller marker, known action, admin flag)
//! influence the response code; notification outcomes never do.

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::notify;
use crate::prelude::*;
use quibble_core::InternalCaller;
use quibble_types::api::{self, AvatarBody, ErrorBody, SubmitBody, TestBody};
use quibble_types::utils::normalize_mail;
use quibble_types::{Comment, Config};

const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Debug, Deserialize)]
pub struct ApiRequest {
	pub action: String,
	#[serde(default)]
	pub data: Value,
}

pub async fn handle(
	State(app): State<App>,
	InternalCaller(internal): InternalCaller,
	Json(request): Json<ApiRequest>,
) -> Response {
	if !internal {
		return respond(&ErrorBody::forbidden("Not an internal caller"));
	}

	info!("Handling action {}", request.action);
	let result = match request.action.as_str() {
		"postSubmit" => post_submit(&app, request.data).await,
		"emailTest" => email_test(&app, request.data).await,
		"getQQAvatar" => get_qq_avatar(&app, request.data).await,
		_ => Ok(respond(&ErrorBody::fail("unknown operation"))),
	};

	match result {
		Ok(response) => response,
		Err(err) => {
			error!("Action {} failed: {}", request.action, err);
			respond(&ErrorBody::fail(err.to_string()))
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostSubmitData {
	comment: Comment,
	#[serde(default)]
	config: Config,
	#[serde(default)]
	parent_comment: Option<Comment>,
}

/// A finalized comment: resolve its avatar, classify it, fan out
/// notifications. Always success-shaped; the comment's mutations are echoed
/// back for the caller to persist.
async fn post_submit(app: &App, data: Value) -> QbResult<Response> {
	let PostSubmitData { mut comment, config, parent_comment } = serde_json::from_value(data)?;

	quibble_avatar::resolve(&app.request, &mut comment, &config).await;
	if let Some(verdict) = quibble_spam::classify(&app.request, &comment, &config).await {
		comment.is_spam = Some(verdict);
	}
	notify::fan_out(app, &comment, &config, parent_comment.as_ref()).await;

	Ok(respond(&SubmitBody {
		code: api::SUCCESS,
		is_spam: comment.is_spam,
		avatar: comment.avatar.clone(),
	}))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailTestData {
	#[serde(default)]
	event: Option<String>,
	#[serde(default)]
	config: Config,
	#[serde(default)]
	is_admin: bool,
}

/// Explicit SMTP connectivity test: drop the cached transport, rebuild and
/// re-verify from scratch, then deliver a test mail to the owner.
async fn email_test(app: &App, data: Value) -> QbResult<Response> {
	let data: EmailTestData = serde_json::from_value(data)?;
	if !data.is_admin {
		return Ok(respond(&ErrorBody::need_login("Admin login required")));
	}
	debug!("Running email test (event: {:?})", data.event);

	app.mailer.reset();
	let mailer = match app.mailer.obtain(&data.config).await {
		Ok(mailer) => mailer,
		Err(err) => {
			warn!("SMTP verification failed: {}", err);
			return Ok(respond(&ErrorBody::fail(err.to_string())));
		}
	};

	let to = data
		.config
		.blogger_email
		.as_deref()
		.or(data.config.sender_email.as_deref())
		.or(data.config.smtp_user.as_deref())
		.unwrap_or_default()
		.to_string();
	let subject = format!("{} 邮件通知测试", data.config.site_name());
	let html = "这是一封测试邮件：如果你收到了这封邮件，说明邮件通知配置成功。".to_string();

	match mailer.send(&to, &subject, html).await {
		Ok(result) => Ok(respond(&TestBody { code: api::SUCCESS, result })),
		Err(err) => Ok(respond(&ErrorBody::fail(err.to_string()))),
	}
}

#[derive(Debug, Deserialize)]
struct QqAvatarData {
	#[serde(default)]
	mail: Option<String>,
}

async fn get_qq_avatar(app: &App, data: Value) -> QbResult<Response> {
	let data: QqAvatarData = serde_json::from_value(data)?;
	let mail = data.mail.as_deref().map(normalize_mail).unwrap_or_default();
	let Some(qq) = quibble_avatar::qq_number(&mail) else {
		return Ok(respond(&ErrorBody::fail("Not a QQ mail address")));
	};
	match quibble_avatar::lookup_qq(&app.request, qq).await {
		Ok(avatar) => Ok(respond(&AvatarBody { code: api::SUCCESS, avatar })),
		Err(err) => {
			warn!("QQ avatar lookup failed: {}", err);
			Ok(respond(&ErrorBody::fail(err.to_string())))
		}
	}
}

/// Serialize a coded body with an explicit UTF-8 JSON content type.
fn respond<T: serde::Serialize>(body: &T) -> Response {
	match serde_json::to_string(body) {
		Ok(json) => ([(header::CONTENT_TYPE, JSON_UTF8)], json).into_response(),
		Err(err) => {
			error!("Failed to serialize response: {}", err);
			StatusCode::INTERNAL_SERVER_ERROR.into_response()
		}
	}
}

// vim: ts=4
