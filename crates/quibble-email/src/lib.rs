//! Email notification support for Quibble
//!
//! This crate provides:
//! - Mail rendering with literal placeholder substitution and built-in
//!   fallback layouts
//! - The SMTP transport lifecycle: lazily constructed, verified with a live
//!   handshake, reused across requests, reset only by the explicit test flow

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod template;
pub mod transport;

pub use template::{RenderedMail, apply_template, render_owner, render_reply};
pub use transport::{Mailer, MailerCell};

mod prelude;

// vim: ts=4
