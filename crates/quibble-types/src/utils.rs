//! Utility functions

/// Normalize an email address for comparison: trimmed, lower-cased.
pub fn normalize_mail(mail: &str) -> String {
	mail.trim().to_lowercase()
}

/// Lowercase hex encoding of a digest.
pub fn hex(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 2);
	for b in bytes {
		out.push_str(&format!("{:02x}", b));
	}
	out
}

/// Parse a loosely-typed boolean setting ("true"/"false"/"1"/"0").
pub fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" => Some(true),
		"false" | "0" => Some(false),
		_ => None,
	}
}


// vim: ts=4
