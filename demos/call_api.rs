//! Signs in through a console authenticator, calls a mocked profile endpoint with the default
//! reqwest transport, and renders both a success and a failure.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::Duration;
// self
use token_gated_api::{
	auth::{AccessToken, AccountId, ScopeSet, Session},
	caller::{ApiResult, TokenGatedApiCaller},
	config::AppConfig,
	identity::{IdentityFuture, InteractiveAuthenticator, MemoryIdentityClient},
};

/// Stands in for a provider popup by printing what it would prompt for.
struct ConsoleAuthenticator;
impl InteractiveAuthenticator for ConsoleAuthenticator {
	fn sign_in(&self) -> IdentityFuture<'_, Session> {
		Box::pin(async {
			println!("[prompt] Sign in to continue.");

			let account = AccountId::new("00000000-0000-0000-66f3-3332eca7ea81.9188040d")
				.expect("Demo account identifier is valid.");

			Ok(Session::builder(account)
				.claim("name", "Alice")
				.claim("preferred_username", "alice@example.com")
				.build())
		})
	}

	fn authorize<'a>(&'a self, scopes: &'a ScopeSet) -> IdentityFuture<'a, AccessToken> {
		Box::pin(async move {
			println!("[prompt] Grant access to `{scopes}`.");

			Ok(AccessToken::builder(scopes.clone())
				.secret("demo-access")
				.issued_now()
				.expires_in(Duration::hours(1))
				.build()
				.expect("Demo token is complete."))
		})
	}
}

fn render(result: &ApiResult) {
	match result {
		ApiResult::Success(payload) => match serde_json::to_string_pretty(payload) {
			Ok(pretty) => println!("{pretty}"),
			Err(_) => println!("{payload}"),
		},
		ApiResult::Failure(failure) => println!("{}", failure.message()),
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = AppConfig::from_json_str(
		r#"{"clientID":"6226576d-37e9-49eb-b201-ec1eeb0029b6","redirectUri":"http://localhost:30662/"}"#,
	)?;
	let server = MockServer::start_async().await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/me").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"displayName\":\"Alice\",\"mail\":\"alice@example.com\"}");
		})
		.await;
	let messages_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/me/messages");
			then.status(403)
				.header("content-type", "application/json")
				.body("{\"error\":\"insufficient_scope\"}");
		})
		.await;
	let identity = Arc::new(MemoryIdentityClient::new(Arc::new(ConsoleAuthenticator)));
	let caller = TokenGatedApiCaller::new(identity).with_authority(config.authority.clone());

	println!("Client {} via {}.", config.client_id, config.authority);

	let session = caller.try_sign_in().await?;

	println!("Signed in as {}.", session.name().unwrap_or("unknown user"));

	render(&caller.call_protected_api(&server.url("/v1.0/me"), &config.api.scopes).await);
	render(&caller.call_protected_api(&server.url("/v1.0/me/messages"), &config.api.scopes).await);

	profile_mock.assert_async().await;
	messages_mock.assert_async().await;

	caller.sign_out().await?;

	println!("Calls: {}, failures: {}.", caller.metrics.attempts(), caller.metrics.failures());

	Ok(())
}
