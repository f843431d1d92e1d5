//! Optional observability helpers for caller operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every operation in a span named `token_gated_api.operation` with
//!   the `operation` and `stage` fields, and to emit a debug event when silent token
//!   acquisition falls back to interaction.
//! - Enable `metrics` to increment the `token_gated_api_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Session lookup with interactive fallback.
	SignIn,
	/// Silent token acquisition with interactive fallback.
	AcquireToken,
	/// Full token-gated API call.
	ProtectedApiCall,
	/// Sign-out.
	SignOut,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::SignIn => "sign_in",
			OperationKind::AcquireToken => "acquire_token",
			OperationKind::ProtectedApiCall => "protected_api_call",
			OperationKind::SignOut => "sign_out",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure reported to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
