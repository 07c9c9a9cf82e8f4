//! SMTP transport lifecycle
//!
//! Two states: uninitialized and verified. The transition requires SMTP
//! credentials plus either a named-service shortcut or explicit host/port
//! settings, and performs a live handshake against the server. The verified
//! handle is process-wide and reused opportunistically; only the explicit
//! connectivity-test action resets it.

use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::prelude::*;
use quibble_types::Config;

/// Verified SMTP transport plus the sender mailbox. Immutable once built.
pub struct Mailer {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	sender: Mailbox,
}

impl Mailer {
	/// Build a transport from configuration and verify it with a live
	/// handshake.
	pub async fn build(config: &Config) -> QbResult<Self> {
		let user = config
			.smtp_user
			.clone()
			.filter(|u| !u.is_empty())
			.ok_or_else(|| Error::ConfigError("SMTP_USER not configured".into()))?;
		let pass = config
			.smtp_pass
			.clone()
			.filter(|p| !p.is_empty())
			.ok_or_else(|| Error::ConfigError("SMTP_PASS not configured".into()))?;

		let (host, port, implicit_tls) = resolve_endpoint(config)?;

		let tls_parameters = TlsParameters::builder(host.clone())
			.build()
			.map_err(|err| Error::ConfigError(format!("TLS configuration error: {}", err)))?;
		let tls = if implicit_tls {
			Tls::Wrapper(tls_parameters)
		} else {
			Tls::Opportunistic(tls_parameters)
		};

		let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host.as_str())
			.port(port)
			.tls(tls)
			.credentials(Credentials::new(user.clone(), pass))
			.build();

		debug!("Verifying SMTP transport against {}:{}", host, port);
		let verified = transport
			.test_connection()
			.await
			.map_err(|err| Error::ServiceUnavailable(format!("SMTP handshake failed: {}", err)))?;
		if !verified {
			return Err(Error::ServiceUnavailable("SMTP connection verification failed".into()));
		}

		let sender = sender_mailbox(config, &user)?;
		Ok(Mailer { transport, sender })
	}

	/// Send an HTML mail. Returns the SMTP acceptance code.
	pub async fn send(&self, to: &str, subject: &str, html: String) -> QbResult<String> {
		let to = to
			.trim()
			.parse::<Mailbox>()
			.map_err(|err| Error::ValidationError(format!("Invalid recipient address: {}", err)))?;
		let message = Message::builder()
			.from(self.sender.clone())
			.to(to)
			.subject(subject)
			.singlepart(SinglePart::html(html))
			.map_err(|err| Error::ValidationError(format!("Failed to build email: {}", err)))?;

		let response = self
			.transport
			.send(message)
			.await
			.map_err(|err| Error::ServiceUnavailable(format!("SMTP send failed: {}", err)))?;
		Ok(format!("{}", response.code()))
	}
}

/// Process-wide lazily-initialized mailer handle.
///
/// Construction is idempotent: concurrent first use may verify twice, both
/// runs either succeed identically or consistently fail, and the lock is
/// never held across the handshake.
#[derive(Default)]
pub struct MailerCell {
	inner: Mutex<Option<Arc<Mailer>>>,
}

impl MailerCell {
	pub fn new() -> Self {
		MailerCell { inner: Mutex::new(None) }
	}

	/// Return the verified handle, building and verifying one first if
	/// needed.
	pub async fn obtain(&self, config: &Config) -> QbResult<Arc<Mailer>> {
		if let Some(mailer) = self.inner.lock().clone() {
			return Ok(mailer);
		}
		let mailer = Arc::new(Mailer::build(config).await?);
		*self.inner.lock() = Some(mailer.clone());
		info!("SMTP transport verified");
		Ok(mailer)
	}

	/// Force back to uninitialized, bypassing the cached handle. Used by the
	/// explicit connectivity-test action.
	pub fn reset(&self) {
		*self.inner.lock() = None;
	}

	pub fn is_initialized(&self) -> bool {
		self.inner.lock().is_some()
	}
}

/// Resolve the SMTP endpoint: named-service shortcut first, explicit
/// host/port/secure settings otherwise.
fn resolve_endpoint(config: &Config) -> QbResult<(String, u16, bool)> {
	if let Some(service) = config.smtp_service.as_deref().filter(|s| !s.is_empty()) {
		let (host, port, implicit_tls) = service_endpoint(service)
			.ok_or_else(|| Error::ConfigError(format!("Unknown SMTP service: {}", service)))?;
		return Ok((host.to_string(), port, implicit_tls));
	}

	let host = config
		.smtp_host
		.clone()
		.filter(|h| !h.is_empty())
		.ok_or_else(|| Error::ConfigError("SMTP_HOST not configured".into()))?;
	let implicit_tls = config.smtp_implicit_tls();
	let port = match config.smtp_port.as_deref().filter(|p| !p.is_empty()) {
		Some(port) => port
			.parse::<u16>()
			.map_err(|_| Error::ConfigError(format!("Invalid SMTP_PORT: {}", port)))?,
		None if implicit_tls => 465,
		None => 587,
	};
	Ok((host, port, implicit_tls))
}

/// Well-known SMTP services: (host, port, implicit TLS).
fn service_endpoint(service: &str) -> Option<(&'static str, u16, bool)> {
	match service.to_lowercase().as_str() {
		"qq" => Some(("smtp.qq.com", 465, true)),
		"gmail" => Some(("smtp.gmail.com", 465, true)),
		"163" => Some(("smtp.163.com", 465, true)),
		"126" => Some(("smtp.126.com", 465, true)),
		"outlook" | "hotmail" => Some(("smtp-mail.outlook.com", 587, false)),
		"office365" => Some(("smtp.office365.com", 587, false)),
		"zoho" => Some(("smtp.zoho.com", 465, true)),
		"yandex" => Some(("smtp.yandex.com", 465, true)),
		"sendgrid" => Some(("smtp.sendgrid.net", 465, true)),
		"aliyun" => Some(("smtp.aliyun.com", 465, true)),
		_ => None,
	}
}

/// Sender mailbox: `SENDER_NAME <SENDER_EMAIL>`, falling back to the SMTP
/// user as the address.
fn sender_mailbox(config: &Config, smtp_user: &str) -> QbResult<Mailbox> {
	let address =
		config.sender_email.as_deref().filter(|a| !a.is_empty()).unwrap_or(smtp_user).trim();
	let raw = match config.sender_name.as_deref().filter(|n| !n.is_empty()) {
		Some(name) => format!("{} <{}>", name, address),
		None => address.to_string(),
	};
	raw.parse::<Mailbox>()
		.map_err(|err| Error::ConfigError(format!("Invalid sender address '{}': {}", raw, err)))
}


// vim: ts=4
