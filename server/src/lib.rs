//! Quibble is a notification dispatcher for a third-party comment widget.
//!
//! # What it does
//!
//! - Accepts one JSON action per request from a trusted internal caller
//!	- `postSubmit`: a finalized comment plus configuration
//!	- `emailTest`: explicit SMTP connectivity test
//!	- `getQQAvatar`: avatar lookup for QQ numeric addresses
//! - Optionally classifies the comment via pluggable spam providers
//! - Resolves a display avatar for the commenter
//! - Fans out best-effort notifications
//!	- email to the blog owner
//!	- email to the parent-comment author
//!	- instant-message push
//!
//! Every notification failure degrades to "side-effect skipped"; nothing is
//! fatal to the handler.

#![forbid(unsafe_code)]

pub mod core;
pub mod dispatch;
pub mod notify;
pub mod prelude;
pub mod routes;

pub use crate::core::app::{App, AppState};

// vim: ts=4
