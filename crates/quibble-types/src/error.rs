//! Error types shared across the dispatcher

use std::fmt;

pub type QbResult<T> = std::result::Result<T, Error>;

/// Central error type.
///
/// Notification and classification paths catch these at the call site and
/// degrade to "side-effect skipped"; only structural request errors surface
/// to the response layer.
#[derive(Debug)]
pub enum Error {
	/// Caller is not a trusted internal caller
	PermissionDenied,

	/// Action requires admin privileges
	NeedLogin,

	/// Request payload failed validation
	ValidationError(String),

	/// A required configuration key is missing or malformed
	ConfigError(String),

	/// An external collaborator (SMTP, spam provider, push gateway) failed
	ServiceUnavailable(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::PermissionDenied => write!(f, "Permission denied"),
			Error::NeedLogin => write!(f, "Admin login required"),
			Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::ValidationError(err.to_string())
	}
}


// vim: ts=4
