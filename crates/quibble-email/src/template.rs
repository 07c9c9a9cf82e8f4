//! Mail rendering with literal placeholder substitution
//!
//! Two render paths: the "new comment" mail for the site owner and the "new
//! reply" mail for a parent-comment author. Each substitutes a fixed set of
//! `${KEY}` tokens into the configured template, or falls back to a built-in
//! HTML layout carrying the same information. Substitution replaces every
//! occurrence of each token and leaves unknown tokens untouched.

use quibble_types::{Comment, Config};

/// Subject and HTML body ready for the SMTP transport.
#[derive(Debug, Clone)]
pub struct RenderedMail {
	pub subject: String,
	pub html: String,
}

const OWNER_FALLBACK: &str = r#"<div style="border:1px solid #ddd;border-radius:6px;padding:16px;font-family:sans-serif">
	<p>您在 <a href="${SITE_URL}" target="_blank">${SITE_NAME}</a> 上收到了新评论：</p>
	<div style="background:#f7f7f7;border-radius:4px;padding:12px">
		<p><img src="${IMG}" height="32" width="32" style="vertical-align:middle;border-radius:50%"> <strong>${NICK}</strong>（${MAIL}，IP: ${IP}）说：</p>
		<blockquote style="margin:0 0 0 8px">${COMMENT}</blockquote>
	</div>
	<p><a href="${POST_URL}" target="_blank">查看完整内容</a></p>
</div>"#;

const REPLY_FALLBACK: &str = r#"<div style="border:1px solid #ddd;border-radius:6px;padding:16px;font-family:sans-serif">
	<p>${PARENT_NICK}，您在 <a href="${SITE_URL}" target="_blank">${SITE_NAME}</a> 上的评论收到了回复：</p>
	<div style="background:#f7f7f7;border-radius:4px;padding:12px">
		<blockquote style="margin:0;color:#888">${PARENT_COMMENT}</blockquote>
		<p><img src="${IMG}" height="32" width="32" style="vertical-align:middle;border-radius:50%"> <strong>${NICK}</strong> 回复说：</p>
		<blockquote style="margin:0 0 0 8px">${COMMENT}</blockquote>
	</div>
	<p><a href="${POST_URL}" target="_blank">查看完整内容</a></p>
</div>"#;

/// Replace every occurrence of each `${KEY}` token. Unknown tokens are left
/// as-is.
pub fn apply_template(template: &str, vars: &[(&str, String)]) -> String {
	let mut out = template.to_string();
	for (key, value) in vars {
		out = out.replace(&format!("${{{}}}", key), value);
	}
	out
}

/// Render the "new comment" notification for the site owner.
pub fn render_owner(comment: &Comment, config: &Config) -> RenderedMail {
	let vars = base_vars(comment, config);
	let template = config
		.mail_template_admin
		.as_deref()
		.filter(|t| !t.is_empty())
		.unwrap_or(OWNER_FALLBACK);
	let subject = match config.mail_subject_admin.as_deref().filter(|s| !s.is_empty()) {
		Some(subject) => apply_template(subject, &vars),
		None => format!("{} 上有新评论了", config.site_name()),
	};
	RenderedMail { subject, html: apply_template(template, &vars) }
}

/// Render the "new reply" notification for the parent-comment author.
pub fn render_reply(comment: &Comment, parent: &Comment, config: &Config) -> RenderedMail {
	let mut vars = base_vars(comment, config);
	vars.push(("PARENT_NICK", parent.nick_or_anonymous().to_string()));
	vars.push(("PARENT_COMMENT", parent.comment.clone().unwrap_or_default()));

	let template =
		config.mail_template.as_deref().filter(|t| !t.is_empty()).unwrap_or(REPLY_FALLBACK);
	let subject = match config.mail_subject.as_deref().filter(|s| !s.is_empty()) {
		Some(subject) => apply_template(subject, &vars),
		None => format!("{}，『{}』上有人回复了你", parent.nick_or_anonymous(), config.site_name()),
	};
	RenderedMail { subject, html: apply_template(template, &vars) }
}

fn base_vars(comment: &Comment, config: &Config) -> Vec<(&'static str, String)> {
	vec![
		("SITE_URL", config.site_url().to_string()),
		("SITE_NAME", config.site_name().to_string()),
		("NICK", comment.nick_or_anonymous().to_string()),
		("IMG", comment.avatar.clone().unwrap_or_default()),
		("IP", comment.ip.clone().unwrap_or_default()),
		("MAIL", comment.mail.clone().unwrap_or_default()),
		("COMMENT", comment.comment.clone().unwrap_or_default()),
		("POST_URL", comment.permalink(config)),
	]
}


// vim: ts=4
