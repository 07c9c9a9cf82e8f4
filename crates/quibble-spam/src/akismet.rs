//! Crowdsourced spam-detection strategy (Akismet)
//!
//! The API key is validated first; an invalid key aborts classification
//! without calling the check endpoint. The check endpoint answers with a
//! literal "true"/"false" body.

use async_trait::async_trait;

use crate::prelude::*;
use crate::SpamStrategy;
use quibble_core::Request;
use quibble_types::{Comment, Config};

const VERIFY_URL: &str = "https://rest.akismet.com/1.1/verify-key";

pub struct Akismet;

#[async_trait]
impl SpamStrategy for Akismet {
	fn name(&self) -> &'static str {
		"akismet"
	}

	fn applicable(&self, config: &Config) -> bool {
		config.akismet_key.as_deref().is_some_and(|k| !k.is_empty())
	}

	async fn classify(
		&self,
		http: &Request,
		comment: &Comment,
		config: &Config,
	) -> QbResult<Option<bool>> {
		let key = config
			.akismet_key
			.as_deref()
			.ok_or_else(|| Error::ConfigError("AKISMET_KEY not configured".into()))?;
		let blog = config.site_url();

		let verdict = http.post_form_text(VERIFY_URL, &[("key", key), ("blog", blog)]).await?;
		if verdict.trim() != "valid" {
			warn!("Akismet key rejected ({}), skipping spam check", verdict.trim());
			return Ok(None);
		}

		let permalink = comment.permalink(config);
		let form: Vec<(&str, &str)> = vec![
			("blog", blog),
			("user_ip", comment.ip.as_deref().unwrap_or_default()),
			("user_agent", comment.ua.as_deref().unwrap_or_default()),
			("permalink", &permalink),
			("comment_type", "comment"),
			("comment_author", comment.nick.as_deref().unwrap_or_default()),
			("comment_author_email", comment.mail.as_deref().unwrap_or_default()),
			("comment_author_url", comment.link.as_deref().unwrap_or_default()),
			("comment_content", comment.comment.as_deref().unwrap_or_default()),
		];

		let check_url = format!("https://{}.rest.akismet.com/1.1/comment-check", key);
		let body = http.post_form_text(&check_url, &form).await?;
		match body.trim() {
			"true" => Ok(Some(true)),
			"false" => Ok(Some(false)),
			other => Err(Error::ServiceUnavailable(format!(
				"Unexpected comment-check response: {}",
				other
			))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_applicable_requires_nonempty_key() {
		assert!(!Akismet.applicable(&Config::default()));
		assert!(!Akismet.applicable(&Config { akismet_key: Some(String::new()), ..Config::default() }));
		assert!(Akismet.applicable(&Config { akismet_key: Some("k".into()), ..Config::default() }));
	}
}

// vim: ts=4
