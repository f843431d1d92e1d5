// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use serde_json::json;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use token_gated_api::{
	auth::{AccessToken, AccountId, ScopeSet, Session},
	caller::TokenGatedApiCaller,
	error::TransportError,
	http::{FetchFuture, HttpFetcher, HttpResponse},
	identity::{
		IdentityClient, IdentityError, IdentityFuture, InteractiveAuthenticator,
		MemoryIdentityClient,
	},
};

const ENDPOINT: &str = "https://graph.microsoft.com/v1.0/me";

#[derive(Default)]
struct CountingAuthenticator {
	sign_ins: AtomicUsize,
	authorizations: AtomicUsize,
	cancel: bool,
}
impl InteractiveAuthenticator for CountingAuthenticator {
	fn sign_in(&self) -> IdentityFuture<'_, Session> {
		Box::pin(async move {
			self.sign_ins.fetch_add(1, Ordering::SeqCst);
			// Suspend like a real prompt so concurrent callers overlap.
			tokio::task::yield_now().await;

			if self.cancel {
				return Err(IdentityError::classify("user_cancelled", None));
			}

			let account = AccountId::new("account-alice").expect("Account fixture should be valid.");

			Ok(Session::builder(account).claim("name", "Alice").build())
		})
	}

	fn authorize<'a>(&'a self, scopes: &'a ScopeSet) -> IdentityFuture<'a, AccessToken> {
		Box::pin(async move {
			let n = self.authorizations.fetch_add(1, Ordering::SeqCst) + 1;

			Ok(AccessToken::builder(scopes.clone())
				.secret(format!("prompted-{n}"))
				.issued_now()
				.expires_in(Duration::hours(1))
				.build()
				.expect("Prompted token should build."))
		})
	}
}

/// Echoes the bearer credential back as the profile payload.
struct EchoFetcher;
impl HttpFetcher for EchoFetcher {
	fn get<'a>(&'a self, _url: &'a Url, headers: &'a [(String, String)]) -> FetchFuture<'a> {
		Box::pin(async move {
			let bearer = headers
				.iter()
				.find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
				.map(|(_, value)| value.clone())
				.ok_or_else(|| {
					TransportError::network(std::io::Error::other("missing authorization header"))
				})?;
			let body = json!({ "name": "Alice", "bearer": bearer }).to_string();

			Ok(HttpResponse::new(200, body).with_header("Content-Type", "application/json"))
		})
	}
}

fn user_read() -> ScopeSet {
	ScopeSet::new(["https://graph.microsoft.com/user.read"]).expect("Scope fixture should be valid.")
}

#[tokio::test]
async fn first_call_prompts_then_reuses_the_cache() {
	let authenticator = Arc::new(CountingAuthenticator::default());
	let identity = Arc::new(MemoryIdentityClient::new(authenticator.clone()));
	let caller = TokenGatedApiCaller::with_fetcher(identity.clone(), Arc::new(EchoFetcher));
	let first = caller.call_protected_api(ENDPOINT, &user_read()).await;
	let second = caller.call_protected_api(ENDPOINT, &user_read()).await;

	assert_eq!(first.success(), Some(&json!({ "name": "Alice", "bearer": "Bearer prompted-1" })));
	assert_eq!(second.success(), Some(&json!({ "name": "Alice", "bearer": "Bearer prompted-1" })));
	assert_eq!(authenticator.sign_ins.load(Ordering::SeqCst), 1);
	assert_eq!(authenticator.authorizations.load(Ordering::SeqCst), 1);
	assert_eq!(identity.cached_tokens(), 1);
}

#[tokio::test]
async fn expiring_token_is_replaced_interactively() {
	let authenticator = Arc::new(CountingAuthenticator::default());
	let account = AccountId::new("account-alice").expect("Account fixture should be valid.");
	let identity = MemoryIdentityClient::new(authenticator.clone())
		.with_session(Session::builder(account).build())
		.with_expiry_skew(Duration::minutes(5));
	let expiring = AccessToken::builder(user_read())
		.secret("expiring")
		.issued_at(OffsetDateTime::now_utc() - Duration::minutes(55))
		.expires_in(Duration::hours(1))
		.build()
		.expect("Expiring token should build.");

	identity.insert_token(expiring);

	let caller = TokenGatedApiCaller::with_fetcher(Arc::new(identity), Arc::new(EchoFetcher));
	let payload = caller
		.try_call_protected_api(ENDPOINT, &user_read())
		.await
		.expect("Interactive fallback should recover from an expiring token.");

	assert_eq!(payload["bearer"], "Bearer prompted-1");
	assert_eq!(authenticator.sign_ins.load(Ordering::SeqCst), 0);
	assert_eq!(caller.metrics.interactive_fallbacks(), 1);
}

#[tokio::test]
async fn concurrent_calls_share_one_sign_in_prompt() {
	let authenticator = Arc::new(CountingAuthenticator::default());
	let caller = TokenGatedApiCaller::with_fetcher(
		Arc::new(MemoryIdentityClient::new(authenticator.clone())),
		Arc::new(EchoFetcher),
	);
	let scopes = user_read();
	let (lhs, rhs) = tokio::join!(
		caller.call_protected_api(ENDPOINT, &scopes),
		caller.call_protected_api(ENDPOINT, &scopes)
	);

	assert!(lhs.is_success());
	assert!(rhs.is_success());
	assert_eq!(authenticator.sign_ins.load(Ordering::SeqCst), 1);
	// Both calls reached the identity client before a session existed.
	assert_eq!(caller.metrics.interactive_sign_ins(), 2);
}

#[tokio::test]
async fn cancelled_sign_in_leaves_no_session() {
	let authenticator = Arc::new(CountingAuthenticator { cancel: true, ..Default::default() });
	let identity = Arc::new(MemoryIdentityClient::new(authenticator.clone()));
	let caller = TokenGatedApiCaller::with_fetcher(identity.clone(), Arc::new(EchoFetcher));
	let result = caller.call_protected_api(ENDPOINT, &user_read()).await;

	assert!(!result.is_success());
	assert!(identity.current_session().is_none());
	assert_eq!(authenticator.authorizations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sign_out_forces_a_new_prompt() {
	let authenticator = Arc::new(CountingAuthenticator::default());
	let caller = TokenGatedApiCaller::with_fetcher(
		Arc::new(MemoryIdentityClient::new(authenticator.clone())),
		Arc::new(EchoFetcher),
	);

	assert!(caller.call_protected_api(ENDPOINT, &user_read()).await.is_success());

	caller.sign_out().await.expect("Sign-out should succeed.");

	let payload = caller
		.try_call_protected_api(ENDPOINT, &user_read())
		.await
		.expect("Calling after sign-out should prompt again.");

	assert_eq!(payload["bearer"], "Bearer prompted-2");
	assert_eq!(authenticator.sign_ins.load(Ordering::SeqCst), 2);
}
