//! Instant-message push notification sending
//!
//! A push target is a (channel, token) pair. Channels are chat-bot HTTP
//! gateways; Bark additionally supports tap-to-open link metadata, the
//! markdown channels carry the permalink inside the message body.

#![deny(clippy::unwrap_used, clippy::panic)]
#![forbid(unsafe_code)]

mod prelude;

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::prelude::*;
use quibble_core::Request;
use quibble_types::{Comment, Config};

/// Named push delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushChannel {
	Bark,
	ServerChan,
	PushPlus,
}

impl PushChannel {
	pub fn parse(name: &str) -> Option<Self> {
		match name.trim().to_lowercase().as_str() {
			"bark" => Some(PushChannel::Bark),
			"serverchan" | "server-chan" | "sc" => Some(PushChannel::ServerChan),
			"pushplus" | "push-plus" => Some(PushChannel::PushPlus),
			_ => None,
		}
	}

	/// Whether the channel accepts structured link metadata (tap-to-open).
	pub fn supports_link(&self) -> bool {
		matches!(self, PushChannel::Bark)
	}
}

/// Message ready for a push gateway. `content` is markdown.
#[derive(Debug, Clone)]
pub struct PushMessage {
	pub title: String,
	pub content: String,
	pub link: Option<String>,
}

/// Format a new-comment push message: nickname, email masked behind a
/// markdown `mailto:` link, IP, tag-stripped content, permalink.
pub fn comment_message(comment: &Comment, config: &Config) -> PushMessage {
	let permalink = comment.permalink(config);
	let nick = comment.nick_or_anonymous();

	let author = match comment.mail.as_deref().filter(|m| !m.is_empty()) {
		Some(mail) => format!("[{}](mailto:{})", nick, mail),
		None => nick.to_string(),
	};
	let author_line = match comment.ip.as_deref().filter(|ip| !ip.is_empty()) {
		Some(ip) => format!("{} ({})", author, ip),
		None => author,
	};

	let body = strip_html(comment.comment.as_deref().unwrap_or_default());
	PushMessage {
		title: format!("{} 上有新评论了", config.site_name()),
		content: format!("{}\n\n{}\n\n[查看评论]({})", author_line, body, permalink),
		link: Some(permalink),
	}
}

/// Submit a message to the gateway for the given channel/token.
pub async fn send(
	http: &Request,
	channel: PushChannel,
	token: &str,
	message: &PushMessage,
) -> QbResult<()> {
	match channel {
		PushChannel::Bark => send_bark(http, token, message).await,
		PushChannel::ServerChan => send_server_chan(http, token, message).await,
		PushChannel::PushPlus => send_push_plus(http, token, message).await,
	}
}

async fn send_bark(http: &Request, token: &str, message: &PushMessage) -> QbResult<()> {
	let url = format!("https://api.day.app/{}", token);
	let mut body = serde_json::json!({
		"title": message.title,
		"body": message.content,
	});
	if let Some(link) = &message.link {
		body["url"] = serde_json::json!(link);
	}
	let ack: GatewayAck = http.post_json(&url, &body).await?;
	ensure_ack("bark", &ack, 200)
}

async fn send_server_chan(http: &Request, token: &str, message: &PushMessage) -> QbResult<()> {
	let url = format!("https://sctapi.ftqq.com/{}.send", token);
	let form = [("title", message.title.as_str()), ("desp", message.content.as_str())];
	let body = http.post_form_text(&url, &form).await?;
	let ack: GatewayAck = serde_json::from_str(&body)
		.map_err(|err| Error::ServiceUnavailable(format!("Bad ServerChan response: {}", err)))?;
	ensure_ack("serverchan", &ack, 0)
}

async fn send_push_plus(http: &Request, token: &str, message: &PushMessage) -> QbResult<()> {
	let body = serde_json::json!({
		"token": token,
		"title": message.title,
		"content": message.content,
		"template": "markdown",
	});
	let ack: GatewayAck = http.post_json("https://www.pushplus.plus/send", &body).await?;
	ensure_ack("pushplus", &ack, 200)
}

fn ensure_ack(channel: &str, ack: &GatewayAck, expected: i64) -> QbResult<()> {
	match ack.code {
		Some(code) if code == expected => {
			debug!("Push accepted by {}", channel);
			Ok(())
		}
		code => Err(Error::ServiceUnavailable(format!(
			"Push gateway {} rejected the message (code {:?})",
			channel, code
		))),
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GatewayAck {
	code: Option<i64>,
}

/// Strip HTML tags from a comment body.
pub fn strip_html(input: &str) -> String {
	static TAG_RE: OnceLock<Regex> = OnceLock::new();
	let re = TAG_RE.get_or_init(|| {
		Regex::new(r"<[^>]*>").expect("tag pattern is valid")
	});
	re.replace_all(input, "").trim().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_channel_parse() {
		assert_eq!(PushChannel::parse("Bark"), Some(PushChannel::Bark));
		assert_eq!(PushChannel::parse(" serverchan "), Some(PushChannel::ServerChan));
		assert_eq!(PushChannel::parse("pushplus"), Some(PushChannel::PushPlus));
		assert_eq!(PushChannel::parse("telegram"), None);
	}

	#[test]
	fn test_only_bark_supports_link() {
		assert!(PushChannel::Bark.supports_link());
		assert!(!PushChannel::ServerChan.supports_link());
		assert!(!PushChannel::PushPlus.supports_link());
	}

	#[test]
	fn test_strip_html() {
		assert_eq!(strip_html("<p>hello <b>world</b></p>"), "hello world");
		assert_eq!(strip_html("plain"), "plain");
		assert_eq!(strip_html("  <br/>  "), "");
	}

	#[test]
	fn test_comment_message_masks_mail_and_links_permalink() {
		let comment = Comment {
			nick: Some("Bob".into()),
			mail: Some("bob@example.com".into()),
			ip: Some("1.2.3.4".into()),
			comment: Some("<p>hi there</p>".into()),
			href: Some("https://x/y".into()),
			id: Some("abc".into()),
			..Comment::default()
		};
		let config = Config { site_name: Some("My Blog".into()), ..Config::default() };
		let message = comment_message(&comment, &config);

		assert_eq!(message.title, "My Blog 上有新评论了");
		assert!(message.content.contains("[Bob](mailto:bob@example.com) (1.2.3.4)"));
		assert!(message.content.contains("hi there"));
		assert!(!message.content.contains("<p>"));
		assert!(message.content.contains("(https://x/y#abc)"));
		assert_eq!(message.link.as_deref(), Some("https://x/y#abc"));
	}

	#[test]
	fn test_comment_message_without_mail_or_ip() {
		let message = comment_message(&Comment::default(), &Config::default());
		assert!(message.content.starts_with("Anonymous\n\n"));
	}
}

// vim: ts=4
