//! Per-request configuration record
//!
//! A flat mapping of named settings controlling SMTP credentials and mode,
//! sender/recipient identity, site metadata, template overrides, spam
//! provider credentials, and the push channel. Supplied fresh on every
//! invocation by the upstream store and read-only within this subsystem.
//!
//! Values arrive as loosely-typed JSON (the store keeps them env-style), so
//! every field is deserialized leniently: strings, numbers, and booleans all
//! collapse to `Option<String>`.

use serde::{Deserialize, Deserializer};

use crate::utils::{normalize_mail, parse_flag};

pub const DEFAULT_GRAVATAR_CDN: &str = "cravatar.cn";
pub const DEFAULT_GRAVATAR_FALLBACK: &str = "mp";
pub const DEFAULT_TENCENT_REGION: &str = "ap-guangzhou";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	// SMTP
	#[serde(rename = "SMTP_SERVICE", deserialize_with = "de_setting")]
	pub smtp_service: Option<String>,
	#[serde(rename = "SMTP_HOST", deserialize_with = "de_setting")]
	pub smtp_host: Option<String>,
	#[serde(rename = "SMTP_PORT", deserialize_with = "de_setting")]
	pub smtp_port: Option<String>,
	#[serde(rename = "SMTP_SECURE", deserialize_with = "de_setting")]
	pub smtp_secure: Option<String>,
	#[serde(rename = "SMTP_USER", deserialize_with = "de_setting")]
	pub smtp_user: Option<String>,
	#[serde(rename = "SMTP_PASS", deserialize_with = "de_setting")]
	pub smtp_pass: Option<String>,

	// Sender / site identity
	#[serde(rename = "SENDER_EMAIL", deserialize_with = "de_setting")]
	pub sender_email: Option<String>,
	#[serde(rename = "SENDER_NAME", deserialize_with = "de_setting")]
	pub sender_name: Option<String>,
	#[serde(rename = "BLOGGER_EMAIL", deserialize_with = "de_setting")]
	pub blogger_email: Option<String>,
	#[serde(rename = "SITE_NAME", deserialize_with = "de_setting")]
	pub site_name: Option<String>,
	#[serde(rename = "SITE_URL", deserialize_with = "de_setting")]
	pub site_url: Option<String>,

	// Mail templates (reply notification / owner notification)
	#[serde(rename = "MAIL_SUBJECT", deserialize_with = "de_setting")]
	pub mail_subject: Option<String>,
	#[serde(rename = "MAIL_TEMPLATE", deserialize_with = "de_setting")]
	pub mail_template: Option<String>,
	#[serde(rename = "MAIL_SUBJECT_ADMIN", deserialize_with = "de_setting")]
	pub mail_subject_admin: Option<String>,
	#[serde(rename = "MAIL_TEMPLATE_ADMIN", deserialize_with = "de_setting")]
	pub mail_template_admin: Option<String>,

	// Spam providers
	#[serde(rename = "TENCENT_SECRET_ID", deserialize_with = "de_setting")]
	pub tencent_secret_id: Option<String>,
	#[serde(rename = "TENCENT_SECRET_KEY", deserialize_with = "de_setting")]
	pub tencent_secret_key: Option<String>,
	#[serde(rename = "TENCENT_REGION", deserialize_with = "de_setting")]
	pub tencent_region: Option<String>,
	#[serde(rename = "AKISMET_KEY", deserialize_with = "de_setting")]
	pub akismet_key: Option<String>,

	// Instant-message push
	#[serde(rename = "PUSH_CHANNEL", deserialize_with = "de_setting")]
	pub push_channel: Option<String>,
	#[serde(rename = "PUSH_TOKEN", deserialize_with = "de_setting")]
	pub push_token: Option<String>,
	#[serde(rename = "SC_MAIL_NOTIFY", deserialize_with = "de_setting")]
	pub sc_mail_notify: Option<String>,

	// Behavior
	#[serde(rename = "NOTIFY_SPAM", deserialize_with = "de_setting")]
	pub notify_spam: Option<String>,
	#[serde(rename = "GRAVATAR_CDN", deserialize_with = "de_setting")]
	pub gravatar_cdn: Option<String>,
	#[serde(rename = "GRAVATAR_DEFAULT", deserialize_with = "de_setting")]
	pub gravatar_default: Option<String>,
}

impl Config {
	/// Owner email normalized for comparison, `None` when unset or blank.
	pub fn normalized_owner_mail(&self) -> Option<String> {
		self.blogger_email.as_deref().map(normalize_mail).filter(|m| !m.is_empty())
	}

	pub fn site_url(&self) -> &str {
		self.site_url.as_deref().unwrap_or("")
	}

	pub fn site_name(&self) -> &str {
		self.site_name.as_deref().unwrap_or("")
	}

	/// Whether spam-flagged comments still trigger notifications. On unless
	/// explicitly disabled.
	pub fn notify_on_spam(&self) -> bool {
		self.notify_spam.as_deref().and_then(parse_flag).unwrap_or(true)
	}

	/// Whether the owner email is sent in addition to a configured push
	/// channel. Off unless explicitly enabled: push takes priority.
	pub fn mail_on_push(&self) -> bool {
		self.sc_mail_notify.as_deref().and_then(parse_flag).unwrap_or(false)
	}

	/// Implicit-TLS SMTP mode; anything else means STARTTLS.
	pub fn smtp_implicit_tls(&self) -> bool {
		self.smtp_secure.as_deref().and_then(parse_flag).unwrap_or(false)
	}

	pub fn push_configured(&self) -> bool {
		self.push_channel.as_deref().is_some_and(|c| !c.is_empty())
			&& self.push_token.as_deref().is_some_and(|t| !t.is_empty())
	}

	pub fn gravatar_cdn(&self) -> &str {
		self.gravatar_cdn.as_deref().filter(|c| !c.is_empty()).unwrap_or(DEFAULT_GRAVATAR_CDN)
	}

	pub fn gravatar_default(&self) -> &str {
		self.gravatar_default
			.as_deref()
			.filter(|d| !d.is_empty())
			.unwrap_or(DEFAULT_GRAVATAR_FALLBACK)
	}

	pub fn tencent_region(&self) -> &str {
		self.tencent_region.as_deref().filter(|r| !r.is_empty()).unwrap_or(DEFAULT_TENCENT_REGION)
	}
}

/// Collapse a loosely-typed setting value to `Option<String>`.
fn de_setting<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<serde_json::Value>::deserialize(deserializer)?;
	Ok(value.and_then(|v| match v {
		serde_json::Value::String(s) => Some(s),
		serde_json::Value::Number(n) => Some(n.to_string()),
		serde_json::Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lenient_setting_deserialization() {
		let config: Config = serde_json::from_value(serde_json::json!({
			"SMTP_PORT": 465,
			"SMTP_SECURE": true,
			"SMTP_USER": "bot@example.com",
			"UNRELATED": "ignored",
		}))
		.unwrap();
		assert_eq!(config.smtp_port.as_deref(), Some("465"));
		assert_eq!(config.smtp_secure.as_deref(), Some("true"));
		assert!(config.smtp_implicit_tls());
		assert_eq!(config.smtp_user.as_deref(), Some("bot@example.com"));
	}

	#[test]
	fn test_notify_on_spam_defaults_on() {
		assert!(Config::default().notify_on_spam());
		let off = Config { notify_spam: Some("false".into()), ..Config::default() };
		assert!(!off.notify_on_spam());
	}

	#[test]
	fn test_mail_on_push_defaults_off() {
		assert!(!Config::default().mail_on_push());
		let on = Config { sc_mail_notify: Some("TRUE".into()), ..Config::default() };
		assert!(on.mail_on_push());
	}

	#[test]
	fn test_push_configured_needs_both_keys() {
		let mut config = Config { push_channel: Some("bark".into()), ..Config::default() };
		assert!(!config.push_configured());
		config.push_token = Some("tok".into());
		assert!(config.push_configured());
	}

	#[test]
	fn test_owner_mail_normalized() {
		let config = Config { blogger_email: Some(" Owner@Site.COM ".into()), ..Config::default() };
		assert_eq!(config.normalized_owner_mail().as_deref(), Some("owner@site.com"));
	}

	#[test]
	fn test_cdn_defaults() {
		let config = Config::default();
		assert_eq!(config.gravatar_cdn(), "cravatar.cn");
		assert_eq!(config.gravatar_default(), "mp");
	}
}

// vim: ts=4
