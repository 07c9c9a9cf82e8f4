//! Spam classification cascade
//!
//! Candidate strategies are evaluated in fixed priority order; the first one
//! applicable to the supplied configuration classifies the comment, and the
//! rest are skipped. Pre-flagged comments and owner comments short-circuit
//! before any provider is consulted. Every failure anywhere in the cascade
//! is caught at the top level and degrades to an undetermined verdict.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod akismet;
pub mod moderation;

mod prelude;

use async_trait::async_trait;

use crate::prelude::*;
use quibble_core::Request;
use quibble_types::{Comment, Config};

/// One candidate spam-check strategy.
#[async_trait]
pub trait SpamStrategy: Send + Sync {
	fn name(&self) -> &'static str;

	/// Whether the configuration carries the credentials this strategy needs.
	fn applicable(&self, config: &Config) -> bool;

	/// Classify the comment. `None` means the provider could not produce a
	/// verdict.
	async fn classify(
		&self,
		http: &Request,
		comment: &Comment,
		config: &Config,
	) -> QbResult<Option<bool>>;
}

/// Fixed priority order: cloud content moderation first, then the
/// crowdsourced checker.
static STRATEGIES: [&dyn SpamStrategy; 2] = [&moderation::TextModeration, &akismet::Akismet];

/// Classify a comment, never propagating provider failures.
///
/// `Some(true)` / `Some(false)` are definitive verdicts; `None` leaves the
/// comment's spam flag untouched (downstream suppression only triggers on an
/// explicit `true`).
pub async fn classify(http: &Request, comment: &Comment, config: &Config) -> Option<bool> {
	match run_cascade(http, comment, config).await {
		Ok(verdict) => verdict,
		Err(err) => {
			warn!("Spam classification failed: {}", err);
			None
		}
	}
}

async fn run_cascade(
	http: &Request,
	comment: &Comment,
	config: &Config,
) -> QbResult<Option<bool>> {
	if comment.is_spam == Some(true) {
		debug!("Comment pre-flagged as spam, honoring flag");
		return Ok(Some(true));
	}

	if let (Some(author), Some(owner)) = (comment.normalized_mail(), config.normalized_owner_mail())
		&& author == owner
	{
		debug!("Owner comment, exempt from spam check");
		return Ok(Some(false));
	}

	for strategy in STRATEGIES {
		if strategy.applicable(config) {
			debug!("Classifying comment via {}", strategy.name());
			return strategy.classify(http, comment, config).await;
		}
	}

	Ok(None)
}


// vim: ts=4
