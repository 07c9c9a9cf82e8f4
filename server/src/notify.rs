//! Notification fan-out
//!
//! Three independently-supervised attempts run concurrently: owner email,
//! reply email, instant-message push. Each attempt swallows its own errors;
//! the join settles all of them and never propagates to the caller.
//!
//! Skip decisions are pure functions over (comment, config, parent) so the
//! guard matrix stays checkable without a live transport.

use futures::future::join_all;

use crate::prelude::*;
use quibble_email::{render_owner, render_reply};
use quibble_push::PushChannel;
use quibble_types::{Comment, Config};

pub async fn fan_out(app: &App, comment: &Comment, config: &Config, parent: Option<&Comment>) {
	if comment.is_spam == Some(true) && !config.notify_on_spam() {
		info!("Spam comment with spam notifications disabled, skipping fan-out");
		return;
	}

	let handles = [
		tokio::spawn(notify_owner(app.clone(), comment.clone(), config.clone())),
		tokio::spawn(notify_reply(app.clone(), comment.clone(), config.clone(), parent.cloned())),
		tokio::spawn(notify_push(app.clone(), comment.clone(), config.clone())),
	];
	let aborted = join_all(handles).await.into_iter().filter(|joined| joined.is_err()).count();
	if aborted > 0 {
		error!("{} notification task(s) aborted unexpectedly", aborted);
	}
}

/// Why the owner email would be skipped, `None` when it should be sent.
fn owner_skip_reason(comment: &Comment, config: &Config) -> Option<&'static str> {
	let author = comment.normalized_mail();
	if author.is_some() && author == config.normalized_owner_mail() {
		return Some("author is the owner");
	}
	if config.push_configured() && !config.mail_on_push() {
		return Some("push channel takes priority over email");
	}
	None
}

/// Why the reply email would be skipped, `None` when it should be sent.
fn reply_skip_reason(
	comment: &Comment,
	config: &Config,
	parent: Option<&Comment>,
) -> Option<&'static str> {
	if comment.pid.as_deref().filter(|p| !p.is_empty()).is_none() {
		return Some("comment has no parent reference");
	}
	let Some(parent) = parent else {
		return Some("no parent comment supplied");
	};
	let Some(parent_mail) = parent.normalized_mail() else {
		return Some("parent comment has no email");
	};
	if config.normalized_owner_mail().as_deref() == Some(parent_mail.as_str()) {
		return Some("parent is the owner");
	}
	if comment.normalized_mail().as_deref() == Some(parent_mail.as_str()) {
		return Some("self-reply");
	}
	None
}

/// Why the push would be skipped, `None` when it should be sent.
fn push_skip_reason(comment: &Comment, config: &Config) -> Option<&'static str> {
	if !config.push_configured() {
		return Some("push channel not configured");
	}
	let author = comment.normalized_mail();
	if author.is_some() && author == config.normalized_owner_mail() {
		return Some("author is the owner");
	}
	None
}

/// Email the blog owner about a new comment.
async fn notify_owner(app: App, comment: Comment, config: Config) {
	if let Some(reason) = owner_skip_reason(&comment, &config) {
		debug!("Skipping owner notification: {}", reason);
		return;
	}
	let Some(to) = config
		.blogger_email
		.as_deref()
		.filter(|m| !m.is_empty())
		.or(config.sender_email.as_deref().filter(|m| !m.is_empty()))
		.map(str::to_string)
	else {
		debug!("No owner address configured, skipping owner notification");
		return;
	};

	let mailer = match app.mailer.obtain(&config).await {
		Ok(mailer) => mailer,
		Err(err) => {
			warn!("Mail transport unavailable, skipping owner notification: {}", err);
			return;
		}
	};

	let mail = render_owner(&comment, &config);
	match mailer.send(&to, &mail.subject, mail.html).await {
		Ok(_) => info!("Owner notification sent to {}", to),
		Err(err) => warn!("Owner notification failed: {}", err),
	}
}

/// Email the parent-comment author about a reply.
async fn notify_reply(app: App, comment: Comment, config: Config, parent: Option<Comment>) {
	if let Some(reason) = reply_skip_reason(&comment, &config, parent.as_ref()) {
		debug!("Skipping reply notification: {}", reason);
		return;
	}
	// reply_skip_reason verified the parent and its email exist
	let Some(parent) = parent else {
		return;
	};
	let Some(to) = parent.mail.clone() else {
		return;
	};

	let mailer = match app.mailer.obtain(&config).await {
		Ok(mailer) => mailer,
		Err(err) => {
			warn!("Mail transport unavailable, skipping reply notification: {}", err);
			return;
		}
	};

	let mail = render_reply(&comment, &parent, &config);
	match mailer.send(&to, &mail.subject, mail.html).await {
		Ok(_) => info!("Reply notification sent to {}", to),
		Err(err) => warn!("Reply notification failed: {}", err),
	}
}

/// Push the new comment to the configured instant-message channel.
async fn notify_push(app: App, comment: Comment, config: Config) {
	if let Some(reason) = push_skip_reason(&comment, &config) {
		debug!("Skipping push notification: {}", reason);
		return;
	}
	let (Some(channel_name), Some(token)) =
		(config.push_channel.as_deref(), config.push_token.as_deref())
	else {
		return;
	};
	let Some(channel) = PushChannel::parse(channel_name) else {
		warn!("Unknown push channel: {}", channel_name);
		return;
	};

	let message = quibble_push::comment_message(&comment, &config);
	match quibble_push::send(&app.request, channel, token, &message).await {
		Ok(()) => info!("Push notification sent via {}", channel_name),
		Err(err) => warn!("Push notification failed: {}", err),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	fn commenter(mail: &str) -> Comment {
		Comment { mail: Some(mail.to_string()), ..Comment::default() }
	}

	fn owner_config() -> Config {
		Config { blogger_email: Some("owner@site.com".into()), ..Config::default() }
	}

	#[test]
	fn test_owner_skips_self_notification() {
		let comment = commenter(" Owner@Site.COM ");
		assert_eq!(owner_skip_reason(&comment, &owner_config()), Some("author is the owner"));
	}

	#[test]
	fn test_owner_skipped_when_push_configured_without_mail_notify() {
		let config = Config {
			push_channel: Some("bark".into()),
			push_token: Some("tok".into()),
			..owner_config()
		};
		let reason = owner_skip_reason(&commenter("visitor@x.com"), &config);
		assert_eq!(reason, Some("push channel takes priority over email"));

		// ...and push itself still fires for that comment
		assert_eq!(push_skip_reason(&commenter("visitor@x.com"), &config), None);
	}

	#[test]
	fn test_owner_sent_when_mail_on_push_enabled() {
		let config = Config {
			push_channel: Some("bark".into()),
			push_token: Some("tok".into()),
			sc_mail_notify: Some("true".into()),
			..owner_config()
		};
		assert_eq!(owner_skip_reason(&commenter("visitor@x.com"), &config), None);
	}

	#[test]
	fn test_reply_skip_scenarios_are_independent() {
		let config = owner_config();
		let parent = commenter("parent@x.com");

		// no pid
		let no_pid = commenter("visitor@x.com");
		assert_eq!(
			reply_skip_reason(&no_pid, &config, Some(&parent)),
			Some("comment has no parent reference")
		);

		// no parent comment supplied
		let with_pid = Comment { pid: Some("p1".into()), ..commenter("visitor@x.com") };
		assert_eq!(
			reply_skip_reason(&with_pid, &config, None),
			Some("no parent comment supplied")
		);

		// parent is the owner
		let owner_parent = commenter("owner@site.com");
		assert_eq!(
			reply_skip_reason(&with_pid, &config, Some(&owner_parent)),
			Some("parent is the owner")
		);

		// self-reply
		let self_parent = commenter("visitor@x.com");
		assert_eq!(
			reply_skip_reason(&with_pid, &config, Some(&self_parent)),
			Some("self-reply")
		);

		// none of the above: send
		assert_eq!(reply_skip_reason(&with_pid, &config, Some(&parent)), None);
	}

	#[test]
	fn test_push_requires_channel_and_token() {
		let comment = commenter("visitor@x.com");
		let no_token =
			Config { push_channel: Some("bark".into()), ..Config::default() };
		assert_eq!(push_skip_reason(&comment, &no_token), Some("push channel not configured"));
	}

	#[test]
	fn test_push_skips_owner_comment() {
		let config = Config {
			push_channel: Some("bark".into()),
			push_token: Some("tok".into()),
			..owner_config()
		};
		assert_eq!(
			push_skip_reason(&commenter("owner@site.com"), &config),
			Some("author is the owner")
		);
	}

	// The async attempts below stop at a guard or a configuration error
	// before any network use, so the joins settle offline.

	#[tokio::test]
	async fn test_fan_out_settles_with_empty_config() {
		let comment = Comment { nick: Some("Bob".into()), ..Comment::default() };
		fan_out(&Arc::new(AppState::new()), &comment, &Config::default(), None).await;
	}

	#[tokio::test]
	async fn test_fan_out_skips_spam_when_disabled() {
		let comment = Comment { is_spam: Some(true), ..Comment::default() };
		let config = Config { notify_spam: Some("false".into()), ..Config::default() };
		fan_out(&Arc::new(AppState::new()), &comment, &config, None).await;
	}
}

// vim: ts=4
