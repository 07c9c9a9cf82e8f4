//! Cloud text-moderation strategy
//!
//! Submits the commenter identity, IP, and base64-encoded content to the
//! Tencent Cloud text moderation API using a TC3-HMAC-SHA256-signed request.
//! Anything other than a "Pass" suggestion classifies the comment as spam.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::prelude::*;
use crate::SpamStrategy;
use quibble_core::Request;
use quibble_types::utils::hex;
use quibble_types::{Comment, Config};

const HOST: &str = "tms.tencentcloudapi.com";
const SERVICE: &str = "tms";
const ACTION: &str = "TextModeration";
const VERSION: &str = "2020-12-29";
const SIGNED_HEADERS: &str = "content-type;host";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub struct TextModeration;

#[async_trait]
impl SpamStrategy for TextModeration {
	fn name(&self) -> &'static str {
		"text-moderation"
	}

	fn applicable(&self, config: &Config) -> bool {
		config.tencent_secret_id.as_deref().is_some_and(|v| !v.is_empty())
			&& config.tencent_secret_key.as_deref().is_some_and(|v| !v.is_empty())
	}

	async fn classify(
		&self,
		http: &Request,
		comment: &Comment,
		config: &Config,
	) -> QbResult<Option<bool>> {
		let secret_id = config
			.tencent_secret_id
			.as_deref()
			.ok_or_else(|| Error::ConfigError("TENCENT_SECRET_ID not configured".into()))?;
		let secret_key = config
			.tencent_secret_key
			.as_deref()
			.ok_or_else(|| Error::ConfigError("TENCENT_SECRET_KEY not configured".into()))?;

		let payload = moderation_payload(comment);
		let now = chrono::Utc::now();
		let headers = build_signed_headers(
			secret_id,
			secret_key,
			config.tencent_region(),
			&payload,
			now.timestamp(),
			&now.format("%Y-%m-%d").to_string(),
		)?;

		let envelope: ModerationEnvelope =
			http.post_signed_json(&format!("https://{}", HOST), &headers, payload).await?;

		let response = envelope.response;
		if let Some(err) = response.error {
			return Err(Error::ServiceUnavailable(format!(
				"Moderation API error {}: {}",
				err.code, err.message
			)));
		}
		match response.suggestion {
			Some(suggestion) => {
				debug!("Moderation suggestion: {}", suggestion);
				Ok(Some(suggestion != "Pass"))
			}
			None => Err(Error::ServiceUnavailable("Moderation response had no suggestion".into())),
		}
	}
}

/// Request body: content is base64-of-UTF8; identity and IP ride along for
/// provider-side reputation.
fn moderation_payload(comment: &Comment) -> String {
	let content = STANDARD.encode(comment.comment.as_deref().unwrap_or_default());
	serde_json::json!({
		"Content": content,
		"User": { "Nickname": comment.nick.as_deref().unwrap_or_default() },
		"Device": { "IP": comment.ip.as_deref().unwrap_or_default() },
	})
	.to_string()
}

/// TC3-HMAC-SHA256 request signing. `timestamp`/`date` are passed in so the
/// derivation stays deterministic under test.
fn build_signed_headers(
	secret_id: &str,
	secret_key: &str,
	region: &str,
	payload: &str,
	timestamp: i64,
	date: &str,
) -> QbResult<Vec<(&'static str, String)>> {
	let hashed_payload = hex(&Sha256::digest(payload.as_bytes()));
	let canonical_request = format!(
		"POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
		CONTENT_TYPE, HOST, SIGNED_HEADERS, hashed_payload
	);

	let credential_scope = format!("{}/{}/tc3_request", date, SERVICE);
	let string_to_sign = format!(
		"TC3-HMAC-SHA256\n{}\n{}\n{}",
		timestamp,
		credential_scope,
		hex(&Sha256::digest(canonical_request.as_bytes()))
	);

	let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), date)?;
	let secret_service = hmac_sha256(&secret_date, SERVICE)?;
	let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
	let signature = hex(&hmac_sha256(&secret_signing, &string_to_sign)?);

	let authorization = format!(
		"TC3-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
		secret_id, credential_scope, SIGNED_HEADERS, signature
	);

	Ok(vec![
		("authorization", authorization),
		("x-tc-action", ACTION.to_string()),
		("x-tc-version", VERSION.to_string()),
		("x-tc-timestamp", timestamp.to_string()),
		("x-tc-region", region.to_string()),
	])
}

fn hmac_sha256(key: &[u8], data: &str) -> QbResult<Vec<u8>> {
	let mut mac = Hmac::<Sha256>::new_from_slice(key)
		.map_err(|err| Error::ValidationError(format!("HMAC key error: {}", err)))?;
	mac.update(data.as_bytes());
	Ok(mac.finalize().into_bytes().to_vec())
}

#[derive(Debug, Deserialize)]
struct ModerationEnvelope {
	#[serde(rename = "Response")]
	response: ModerationResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModerationResponse {
	#[serde(rename = "Suggestion")]
	suggestion: Option<String>,
	#[serde(rename = "Error")]
	error: Option<ModerationError>,
}

#[derive(Debug, Deserialize)]
struct ModerationError {
	#[serde(rename = "Code")]
	code: String,
	#[serde(rename = "Message")]
	message: String,
}


// vim: ts=4
