//! Crate-level error types shared by the caller, identity, and transport layers.

// self
use crate::{_prelude::*, identity::IdentityError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error surfaced by every public operation.
///
/// Each variant is terminal for the call attempt that produced it; nothing is retried
/// automatically. [`Error::kind`] groups variants into the coarse [`ErrorKind`] taxonomy.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure while reaching the protected API.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// No session exists and interaction is disabled.
	#[error("No user is signed in and interactive sign-in is disabled.")]
	SignInRequired,
	/// Interactive sign-in failed or was cancelled.
	#[error("Sign-in failed: {source}")]
	SignInFailed {
		/// Identity client failure.
		#[source]
		source: IdentityError,
	},
	/// Sign-out could not be completed by the identity client.
	#[error("Sign-out failed: {source}")]
	SignOutFailed {
		/// Identity client failure.
		#[source]
		source: IdentityError,
	},
	/// Silent acquisition failed and interaction is disabled.
	#[error("Silent token acquisition failed: {source}")]
	SilentAcquisitionFailed {
		/// Identity client failure.
		#[source]
		source: IdentityError,
	},
	/// Interactive acquisition failed after the silent attempt.
	#[error("Interactive token acquisition failed: {source}")]
	InteractiveAcquisitionFailed {
		/// Identity client failure.
		#[source]
		source: IdentityError,
	},
	/// The API answered with a non-success status or a non-JSON content type.
	#[error("API responded with HTTP {status}.")]
	ApiNonSuccessStatus {
		/// HTTP status code.
		status: u16,
		/// Content type reported by the API, if any.
		content_type: Option<String>,
		/// JSON error body returned by the API.
		body: Value,
	},
	/// The response body could not be parsed as JSON.
	#[error("API response body is not valid JSON.")]
	ResponseParseError {
		/// HTTP status code of the unparsable response.
		status: u16,
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Returns the coarse taxonomy bucket for this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Config,
			Self::Transport(_) => ErrorKind::Transport,
			Self::SignInRequired => ErrorKind::Authentication,
			Self::SignInFailed { source } | Self::SignOutFailed { source } => match source {
				IdentityError::Provider { .. } => ErrorKind::Authority,
				IdentityError::Network { .. } => ErrorKind::Transport,
				_ => ErrorKind::Authentication,
			},
			Self::SilentAcquisitionFailed { source }
			| Self::InteractiveAcquisitionFailed { source } => match source {
				IdentityError::Provider { .. } => ErrorKind::Authority,
				IdentityError::Network { .. } => ErrorKind::Transport,
				_ => ErrorKind::Authorization,
			},
			Self::ApiNonSuccessStatus { status: 401 | 403, .. } => ErrorKind::Authorization,
			Self::ApiNonSuccessStatus { .. } | Self::ResponseParseError { .. } =>
				ErrorKind::ResponseFormat,
		}
	}

	/// Returns the identity provider's error description, when one was reported.
	pub fn provider_description(&self) -> Option<&str> {
		match self {
			Self::SignInFailed { source }
			| Self::SignOutFailed { source }
			| Self::SilentAcquisitionFailed { source }
			| Self::InteractiveAcquisitionFailed { source } => source.description(),
			_ => None,
		}
	}
}

/// Coarse error taxonomy used for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Sign-in required, failed, or cancelled.
	Authentication,
	/// Token acquisition failed, or the API refused the token.
	Authorization,
	/// Network failure reaching the API or the identity provider.
	Transport,
	/// Unexpected content type or unparsable body.
	ResponseFormat,
	/// Identity provider reported an error with a description.
	Authority,
	/// Invalid local configuration or input.
	Config,
}
impl ErrorKind {
	/// Returns a stable label suitable for logs or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Authentication => "authentication",
			ErrorKind::Authorization => "authorization",
			ErrorKind::Transport => "transport",
			ErrorKind::ResponseFormat => "response_format",
			ErrorKind::Authority => "authority",
			ErrorKind::Config => "config",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and input validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration file could not be read.
	#[error("Failed to read configuration from {path}.")]
	Read {
		/// Path that failed to load.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration JSON is malformed or has the wrong shape.
	#[error("Configuration is malformed at `{}`.", .source.path())]
	Parse {
		/// Structured parsing failure with the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A configured URL uses a scheme that is not allowed.
	#[error("The {field} URL must use {expected}: {url}.")]
	InsecureUrl {
		/// Which configuration field failed validation.
		field: &'static str,
		/// Scheme requirement.
		expected: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// The API target requests no scopes.
	#[error("The API target must request at least one scope.")]
	EmptyScopes,
	/// Endpoint string is not an absolute URL.
	#[error("Endpoint `{endpoint}` is not a valid URL.")]
	InvalidEndpoint {
		/// Raw endpoint string.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
