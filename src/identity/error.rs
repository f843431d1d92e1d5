//! Identity client failures and provider error-code classification.

// self
use crate::{_prelude::*, error::BoxError};

/// Failure reported by an [`IdentityClient`](crate::identity::IdentityClient).
#[derive(Debug, ThisError)]
pub enum IdentityError {
	/// The user closed or cancelled the provider flow.
	#[error("The user cancelled the identity provider flow.")]
	Cancelled,
	/// A silent operation needs the user (cache miss, expired token, consent).
	#[error("User interaction is required: {reason}.")]
	InteractionRequired {
		/// Why the silent path could not complete.
		reason: String,
	},
	/// Provider-reported error.
	#[error("Identity provider returned `{code}`.")]
	Provider {
		/// Provider error code (`invalid_client`, `AADSTS50011`, ...).
		code: String,
		/// Provider error description, when supplied.
		description: Option<String>,
	},
	/// The identity provider could not be reached.
	#[error("Network error occurred while contacting the identity provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl IdentityError {
	/// Builds an interaction-required error.
	pub fn interaction_required(reason: impl Into<String>) -> Self {
		Self::InteractionRequired { reason: reason.into() }
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Maps a provider error code (and optional description) onto the error taxonomy.
	///
	/// Exact codes win over description hints; unknown codes stay
	/// [`IdentityError::Provider`] so the description reaches the user unchanged.
	pub fn classify(code: &str, description: Option<&str>) -> Self {
		let kind = match_code(code)
			.or_else(|| description.and_then(match_code))
			.or_else(|| description.and_then(match_text));

		match kind {
			Some(CodeKind::Cancelled) => Self::Cancelled,
			Some(CodeKind::InteractionRequired) => Self::InteractionRequired {
				reason: description.map(str::to_owned).unwrap_or_else(|| code.to_owned()),
			},
			None => Self::Provider {
				code: code.to_owned(),
				description: description.map(str::to_owned),
			},
		}
	}

	/// Provider-supplied description, if any.
	pub fn description(&self) -> Option<&str> {
		match self {
			Self::Provider { description, .. } => description.as_deref(),
			Self::InteractionRequired { reason } => Some(reason),
			_ => None,
		}
	}

	/// Returns `true` when retrying interactively could resolve the failure.
	pub fn is_interaction_required(&self) -> bool {
		matches!(self, Self::InteractionRequired { .. })
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CodeKind {
	Cancelled,
	InteractionRequired,
}

fn match_code(value: &str) -> Option<CodeKind> {
	const CANCELLED: [&str; 3] = ["user_cancelled", "user_canceled", "access_denied"];
	const INTERACTION: [&str; 5] = [
		"interaction_required",
		"login_required",
		"consent_required",
		"token_expired",
		"no_tokens_found",
	];

	if CANCELLED.iter().any(|code| value.eq_ignore_ascii_case(code)) {
		Some(CodeKind::Cancelled)
	} else if INTERACTION.iter().any(|code| value.eq_ignore_ascii_case(code)) {
		Some(CodeKind::InteractionRequired)
	} else {
		None
	}
}

fn match_text(text: &str) -> Option<CodeKind> {
	let lowered = text.to_ascii_lowercase();

	match lowered.as_str() {
		t if t.contains("user_cancelled") || t.contains("cancelled by the user") =>
			Some(CodeKind::Cancelled),
		t if t.contains("interaction_required") || t.contains("consent_required") =>
			Some(CodeKind::InteractionRequired),
		_ => None,
	}
}
