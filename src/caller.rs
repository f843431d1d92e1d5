//! Token-gated API caller: session check, token acquisition with interactive fallback, and
//! one authorized GET.
//!
//! [`TokenGatedApiCaller::call_protected_api`] runs a fixed chain per call:
//!
//! 1. Reuse the identity client's current session, or run interactive sign-in once.
//! 2. Acquire a token silently; on any silent failure, acquire it interactively once.
//! 3. Send a single GET with `Authorization: Bearer <token>`.
//! 4. Return the JSON body on `200` + `application/json`, otherwise a failure carrying the
//!    endpoint and the API's JSON error body.
//!
//! Every step is terminal on failure; nothing is retried. Independent calls are not
//! coordinated by the caller, so two concurrent calls may each reach the identity client.

mod metrics;
mod result;

pub use metrics::CallMetrics;
pub use result::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet, Session},
	config::ApiTarget,
	error::ConfigError,
	http::{HttpFetcher, HttpResponse},
	identity::IdentityClient,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpFetcher;

#[cfg(feature = "reqwest")]
/// Caller specialized for the crate's default reqwest transport.
pub type ReqwestApiCaller<I> = TokenGatedApiCaller<I, ReqwestHttpFetcher>;

/// Whether the caller may prompt the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
	/// Fall back to interactive sign-in and token acquisition.
	#[default]
	Allowed,
	/// Never prompt; missing sessions and silent failures are terminal.
	Never,
}

/// Calls protected endpoints on behalf of the signed-in user.
///
/// The caller owns no credentials. Sessions and tokens come from the injected
/// [`IdentityClient`], and the request goes through the injected [`HttpFetcher`], so one
/// caller can be shared behind `Arc` by any number of tasks.
pub struct TokenGatedApiCaller<I, F>
where
	I: ?Sized + IdentityClient,
	F: ?Sized + HttpFetcher,
{
	/// Identity client providing sessions and tokens.
	pub identity: Arc<I>,
	/// HTTP transport used for the protected GET.
	pub fetcher: Arc<F>,
	/// Whether interactive fallbacks are permitted.
	pub interaction: InteractionMode,
	/// Shared counters for call outcomes.
	pub metrics: Arc<CallMetrics>,
	/// Sign-in authority that sign-in failures are reported against.
	pub authority: Option<Url>,
}
impl<I, F> TokenGatedApiCaller<I, F>
where
	I: ?Sized + IdentityClient,
	F: ?Sized + HttpFetcher,
{
	/// Creates a caller that reuses the provided identity client and transport.
	pub fn with_fetcher(identity: Arc<I>, fetcher: Arc<F>) -> Self {
		Self {
			identity,
			fetcher,
			interaction: InteractionMode::default(),
			metrics: Default::default(),
			authority: None,
		}
	}

	/// Records the sign-in authority used by [`Self::try_sign_in`] reports.
	pub fn with_authority(mut self, authority: Url) -> Self {
		self.authority = Some(authority);

		self
	}

	/// Overrides the interaction mode.
	pub fn with_interaction(mut self, interaction: InteractionMode) -> Self {
		self.interaction = interaction;

		self
	}

	/// Returns the signed-in session without prompting.
	pub fn current_session(&self) -> Option<Session> {
		self.identity.current_session()
	}

	/// Returns the current session, signing in interactively once when none exists.
	pub async fn sign_in(&self) -> Result<Session> {
		const KIND: OperationKind = OperationKind::SignIn;

		let span = OperationSpan::new(KIND, "sign_in");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.ensure_session()).await;

		record_outcome(KIND, &result);

		result
	}

	/// Same as [`Self::sign_in`], reporting a failure against the configured authority.
	pub async fn try_sign_in(&self) -> std::result::Result<Session, ApiFailure> {
		self.sign_in().await.map_err(|error| {
			let authority = self.authority.as_ref().map(Url::as_str).unwrap_or_default();

			ApiFailure::new(authority, error)
		})
	}

	/// Signs the user out through the identity client.
	pub async fn sign_out(&self) -> Result<()> {
		const KIND: OperationKind = OperationKind::SignOut;

		let span = OperationSpan::new(KIND, "sign_out");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.identity.sign_out().await.map_err(|source| Error::SignOutFailed { source })
			})
			.await;

		record_outcome(KIND, &result);

		result
	}

	/// Acquires a token for `scopes`: silently first, then interactively once.
	pub async fn acquire_token(&self, scopes: &ScopeSet) -> Result<AccessToken> {
		const KIND: OperationKind = OperationKind::AcquireToken;

		let span = OperationSpan::new(KIND, "acquire_token");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.acquire_with_fallback(scopes)).await;

		record_outcome(KIND, &result);

		result
	}

	/// Runs the full chain against `endpoint` and reports the outcome as an [`ApiResult`].
	pub async fn call_protected_api(&self, endpoint: &str, required_scopes: &ScopeSet) -> ApiResult {
		self.try_call_protected_api(endpoint, required_scopes)
			.await
			.map_err(|error| ApiFailure::new(endpoint, error))
			.into()
	}

	/// Calls the endpoint of a configured [`ApiTarget`] with its scopes.
	pub async fn call_target(&self, target: &ApiTarget) -> ApiResult {
		self.call_protected_api(target.endpoint.as_str(), &target.scopes).await
	}

	/// Same chain as [`Self::call_protected_api`], surfacing the crate [`Error`] directly.
	pub async fn try_call_protected_api(
		&self,
		endpoint: &str,
		required_scopes: &ScopeSet,
	) -> Result<Value> {
		const KIND: OperationKind = OperationKind::ProtectedApiCall;

		let span = OperationSpan::new(KIND, "call_protected_api");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(async move {
				let url = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
					endpoint: endpoint.to_owned(),
					source,
				})?;

				self.ensure_session().await?;

				let token = self.acquire_with_fallback(required_scopes).await?;
				let headers = [token.authorization_header()];
				let response = self.fetcher.get(&url, &headers).await?;

				interpret_response(response)
			})
			.await;

		match &result {
			Ok(_) => self.metrics.record_success(),
			Err(_) => self.metrics.record_failure(),
		}

		record_outcome(KIND, &result);

		result
	}

	async fn ensure_session(&self) -> Result<Session> {
		if let Some(session) = self.identity.current_session() {
			return Ok(session);
		}
		if self.interaction == InteractionMode::Never {
			return Err(Error::SignInRequired);
		}

		self.metrics.record_interactive_sign_in();

		self.identity.sign_in_interactive().await.map_err(|source| Error::SignInFailed { source })
	}

	async fn acquire_with_fallback(&self, scopes: &ScopeSet) -> Result<AccessToken> {
		let silent = match self.identity.acquire_token_silent(scopes).await {
			Ok(token) => return Ok(token),
			Err(e) => e,
		};

		if self.interaction == InteractionMode::Never {
			return Err(Error::SilentAcquisitionFailed { source: silent });
		}

		obs::record_silent_fallback(scopes, &silent);
		self.metrics.record_interactive_fallback();

		self.identity
			.acquire_token_interactive(scopes)
			.await
			.map_err(|source| Error::InteractiveAcquisitionFailed { source })
	}
}
#[cfg(feature = "reqwest")]
impl<I> TokenGatedApiCaller<I, ReqwestHttpFetcher>
where
	I: ?Sized + IdentityClient,
{
	/// Creates a caller backed by a default reqwest client.
	pub fn new(identity: Arc<I>) -> Self {
		Self::with_fetcher(identity, Arc::new(ReqwestHttpFetcher::default()))
	}
}
impl<I, F> Clone for TokenGatedApiCaller<I, F>
where
	I: ?Sized + IdentityClient,
	F: ?Sized + HttpFetcher,
{
	fn clone(&self) -> Self {
		Self {
			identity: self.identity.clone(),
			fetcher: self.fetcher.clone(),
			interaction: self.interaction,
			metrics: self.metrics.clone(),
			authority: self.authority.clone(),
		}
	}
}
impl<I, F> Debug for TokenGatedApiCaller<I, F>
where
	I: ?Sized + IdentityClient,
	F: ?Sized + HttpFetcher,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGatedApiCaller")
			.field("interaction", &self.interaction)
			.field("authority", &self.authority)
			.field("signed_in", &self.identity.current_session().is_some())
			.field("metrics", &self.metrics)
			.finish()
	}
}

fn record_outcome<T>(kind: OperationKind, result: &Result<T>) {
	let outcome = match result {
		Ok(_) => OperationOutcome::Success,
		Err(_) => OperationOutcome::Failure,
	};

	obs::record_operation_outcome(kind, outcome);
}

fn interpret_response(response: HttpResponse) -> Result<Value> {
	let status = response.status;
	let parse = |body: &[u8]| {
		serde_json::from_slice::<Value>(body)
			.map_err(|source| Error::ResponseParseError { status, source })
	};

	if status == 200 && response.is_json() {
		return parse(&response.body);
	}

	let body = parse(&response.body)?;

	Err(Error::ApiNonSuccessStatus {
		status,
		content_type: response.content_type().map(str::to_owned),
		body,
	})
}
