//! App state type

use std::sync::Arc;

use quibble_core::Request;
use quibble_email::MailerCell;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide state: the shared outbound HTTP client and the lazily
/// initialized mail transport handle. Everything else is per-request.
#[derive(Default)]
pub struct AppState {
	pub request: Request,
	pub mailer: MailerCell,
}

pub type App = Arc<AppState>;

impl AppState {
	pub fn new() -> Self {
		AppState { request: Request::new(), mailer: MailerCell::new() }
	}
}

// vim: ts=4
