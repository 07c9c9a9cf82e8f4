//! Avatar resolution
//!
//! A comment that already carries an avatar keeps it verbatim. QQ numeric
//! addresses get a live lookup against the platform's public avatar API;
//! everyone else gets a CDN URL derived from a hash of the normalized email
//! (or the nickname when no email is present). The cravatar CDN expects MD5
//! digests, every other CDN gets SHA-256.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod prelude;

use md5::{Digest, Md5};
use serde::Deserialize;
use sha2::Sha256;

use crate::prelude::*;
use quibble_core::Request;
use quibble_types::utils::hex;
use quibble_types::{Comment, Config};

const QQ_AVATAR_API: &str = "https://api.usuuu.com/qq";

/// Resolve and cache an avatar onto the comment record.
///
/// QQ lookup failures are logged and leave the comment without an avatar;
/// they never abort the request.
pub async fn resolve(http: &Request, comment: &mut Comment, config: &Config) {
	if comment.avatar.as_deref().is_some_and(|a| !a.is_empty()) {
		return;
	}

	let normalized = comment.normalized_mail();
	if let Some(qq) = normalized.as_deref().and_then(qq_number) {
		match lookup_qq(http, qq).await {
			Ok(avatar) => comment.avatar = Some(avatar),
			Err(err) => warn!("QQ avatar lookup failed for {}: {}", qq, err),
		}
		return;
	}

	comment.avatar = Some(cdn_avatar_url(comment, config));
}

/// Extract the numeric id from a QQ mail address, `None` for anything else.
pub fn qq_number(mail: &str) -> Option<&str> {
	let digits = mail.strip_suffix("@qq.com")?;
	(!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

/// Live lookup of a QQ avatar by numeric id.
pub async fn lookup_qq(http: &Request, qq: &str) -> QbResult<String> {
	let lookup: QqLookup = http.get_json(&format!("{}/{}", QQ_AVATAR_API, qq)).await?;
	lookup
		.data
		.and_then(|profile| profile.avatar)
		.filter(|avatar| !avatar.is_empty())
		.ok_or_else(|| Error::ServiceUnavailable("Avatar missing from QQ lookup response".into()))
}

/// CDN avatar URL from the identity hash. A store-supplied `mailMd5` digest
/// is used as-is.
pub fn cdn_avatar_url(comment: &Comment, config: &Config) -> String {
	let cdn = config.gravatar_cdn();
	let hash = match comment.mail_md5.as_deref().filter(|h| !h.is_empty()) {
		Some(digest) => digest.to_string(),
		None => {
			let source = comment
				.normalized_mail()
				.or_else(|| comment.nick.as_deref().map(|n| n.trim().to_string()))
				.unwrap_or_default();
			if cdn.contains("cravatar") {
				hex(&Md5::digest(source.as_bytes()))
			} else {
				hex(&Sha256::digest(source.as_bytes()))
			}
		}
	};
	format!("https://{}/avatar/{}?d={}", cdn, hash, config.gravatar_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QqLookup {
	data: Option<QqProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QqProfile {
	avatar: Option<String>,
}


// vim: ts=4
