//! Coded API response bodies
//!
//! Every response carries a numeric result code. Notification outcomes never
//! influence the code: `postSubmit` is success-shaped unless the request
//! itself is structurally invalid.

use serde::Serialize;

pub const SUCCESS: u16 = 0;
pub const FAIL: u16 = 1000;
pub const NEED_LOGIN: u16 = 1024;
pub const FORBIDDEN: u16 = 1403;

/// Generic error-shaped body (`FAIL` / `NEED_LOGIN` / `FORBIDDEN`).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
	pub code: u16,
	pub message: String,
}

impl ErrorBody {
	pub fn fail(message: impl Into<String>) -> Self {
		ErrorBody { code: FAIL, message: message.into() }
	}

	pub fn need_login(message: impl Into<String>) -> Self {
		ErrorBody { code: NEED_LOGIN, message: message.into() }
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		ErrorBody { code: FORBIDDEN, message: message.into() }
	}
}

/// `postSubmit` result. `isSpam` is omitted when classification stayed
/// undetermined.
#[derive(Debug, Serialize)]
pub struct SubmitBody {
	pub code: u16,
	#[serde(rename = "isSpam", skip_serializing_if = "Option::is_none")]
	pub is_spam: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
}

/// `emailTest` success result.
#[derive(Debug, Serialize)]
pub struct TestBody {
	pub code: u16,
	pub result: String,
}

/// `getQQAvatar` success result.
#[derive(Debug, Serialize)]
pub struct AvatarBody {
	pub code: u16,
	pub avatar: String,
}


// vim: ts=4
