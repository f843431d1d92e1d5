//! Outcome of one protected API call attempt.

// self
use crate::{_prelude::*, error::ErrorKind};

/// Result of [`call_protected_api`](crate::caller::TokenGatedApiCaller::call_protected_api).
#[derive(Debug)]
pub enum ApiResult {
	/// The API answered `200` with a JSON body.
	Success(Value),
	/// Any step of the call chain failed.
	Failure(ApiFailure),
}
impl ApiResult {
	/// Returns `true` for [`ApiResult::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// Borrows the success payload, if any.
	pub fn success(&self) -> Option<&Value> {
		match self {
			Self::Success(payload) => Some(payload),
			Self::Failure(_) => None,
		}
	}

	/// Borrows the failure, if any.
	pub fn failure(&self) -> Option<&ApiFailure> {
		match self {
			Self::Success(_) => None,
			Self::Failure(failure) => Some(failure),
		}
	}

	/// Converts into a standard [`Result`](std::result::Result).
	pub fn into_result(self) -> std::result::Result<Value, ApiFailure> {
		match self {
			Self::Success(payload) => Ok(payload),
			Self::Failure(failure) => Err(failure),
		}
	}
}
impl From<std::result::Result<Value, ApiFailure>> for ApiResult {
	fn from(value: std::result::Result<Value, ApiFailure>) -> Self {
		match value {
			Ok(payload) => Self::Success(payload),
			Err(failure) => Self::Failure(failure),
		}
	}
}

/// Failed call: the endpoint that was targeted plus the terminal error.
#[derive(Debug)]
pub struct ApiFailure {
	/// Endpoint string exactly as the caller supplied it.
	pub endpoint: String,
	/// Terminal error of the call chain.
	pub error: Error,
}
impl ApiFailure {
	/// Pairs an error with the endpoint it occurred for.
	pub fn new(endpoint: impl Into<String>, error: Error) -> Self {
		Self { endpoint: endpoint.into(), error }
	}

	/// Coarse taxonomy bucket of the underlying error.
	pub fn kind(&self) -> ErrorKind {
		self.error.kind()
	}

	/// JSON detail: the API's error body for non-success responses, otherwise the error
	/// message as a JSON string.
	pub fn detail(&self) -> Value {
		match &self.error {
			Error::ApiNonSuccessStatus { body, .. } => body.clone(),
			error => Value::String(error.to_string()),
		}
	}

	/// Identity provider's error description, when one was reported.
	pub fn description(&self) -> Option<&str> {
		self.error.provider_description()
	}

	/// Multi-line, user-facing rendering of the failure.
	pub fn message(&self) -> String {
		let detail = match self.detail() {
			Value::String(text) => text,
			other => other.to_string(),
		};
		let mut message =
			format!("An error has occurred:\nEndpoint: {}\nError: {detail}", self.endpoint);

		if let Some(description) = self.description() {
			message.push('\n');
			message.push_str(description);
		}

		message
	}
}
impl Display for ApiFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.message())
	}
}
impl StdError for ApiFailure {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		Some(&self.error)
	}
}
