//! Comment record supplied by the upstream storage layer
//!
//! All fields are optional at the serde level and unknown fields are
//! ignored: the storage layer owns the record shape, this subsystem only
//! reads identity/content fields and writes back `avatar` and `isSpam`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::utils::normalize_mail;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
	pub nick: Option<String>,
	pub mail: Option<String>,
	/// Pre-hashed email digest, supplied when the store withholds the
	/// plaintext address
	pub mail_md5: Option<String>,
	pub ip: Option<String>,
	pub ua: Option<String>,
	/// Commenter's own website link
	pub link: Option<String>,
	pub avatar: Option<String>,
	/// Comment body, HTML-bearing
	pub comment: Option<String>,
	pub href: Option<String>,
	pub url: Option<String>,
	#[serde(alias = "_id")]
	pub id: Option<String>,
	/// Direct parent comment id
	pub pid: Option<String>,
	/// Root comment id of the thread
	pub rid: Option<String>,
	pub is_spam: Option<bool>,
}

impl Comment {
	/// Author email normalized for comparison, `None` when absent or blank.
	pub fn normalized_mail(&self) -> Option<String> {
		self.mail.as_deref().map(normalize_mail).filter(|m| !m.is_empty())
	}

	pub fn nick_or_anonymous(&self) -> &str {
		self.nick.as_deref().filter(|n| !n.is_empty()).unwrap_or("Anonymous")
	}

	/// Permalink to this comment: the comment's own link (or site URL plus
	/// relative path), with any pre-existing URL fragment replaced by the
	/// comment's identifier.
	pub fn permalink(&self, config: &Config) -> String {
		let href = self.href.as_deref().or(self.url.as_deref());
		let base = match href {
			Some(h) if h.starts_with("http://") || h.starts_with("https://") => h.to_string(),
			Some(h) => format!("{}{}", config.site_url().trim_end_matches('/'), h),
			None => config.site_url().to_string(),
		};
		let base = base.split('#').next().unwrap_or_default();
		match self.id.as_deref() {
			Some(id) if !id.is_empty() => format!("{}#{}", base, id),
			_ => base.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config_with_site(url: &str) -> Config {
		Config { site_url: Some(url.to_string()), ..Config::default() }
	}

	#[test]
	fn test_permalink_replaces_existing_fragment() {
		let comment = Comment {
			href: Some("https://x/y#old".into()),
			id: Some("abc".into()),
			..Comment::default()
		};
		assert_eq!(comment.permalink(&Config::default()), "https://x/y#abc");
	}

	#[test]
	fn test_permalink_appends_fragment() {
		let comment = Comment {
			href: Some("https://x/y".into()),
			id: Some("abc".into()),
			..Comment::default()
		};
		assert_eq!(comment.permalink(&Config::default()), "https://x/y#abc");
	}

	#[test]
	fn test_permalink_joins_relative_path_to_site_url() {
		let comment = Comment {
			href: Some("/posts/hello/".into()),
			id: Some("c1".into()),
			..Comment::default()
		};
		let config = config_with_site("https://blog.example.com/");
		assert_eq!(comment.permalink(&config), "https://blog.example.com/posts/hello/#c1");
	}

	#[test]
	fn test_permalink_without_id_keeps_base() {
		let comment = Comment { href: Some("https://x/y#old".into()), ..Comment::default() };
		assert_eq!(comment.permalink(&Config::default()), "https://x/y");
	}

	#[test]
	fn test_deserialize_underscore_id_alias() {
		let comment: Comment =
			serde_json::from_value(serde_json::json!({ "_id": "xyz", "isSpam": true, "extra": 1 }))
				.unwrap();
		assert_eq!(comment.id.as_deref(), Some("xyz"));
		assert_eq!(comment.is_spam, Some(true));
	}

	#[test]
	fn test_normalized_mail_filters_blank() {
		let comment = Comment { mail: Some("  ".into()), ..Comment::default() };
		assert_eq!(comment.normalized_mail(), None);
	}
}

// vim: ts=4
