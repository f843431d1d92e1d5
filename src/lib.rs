//! Token-gated API calls: sign in through an injected identity client, acquire bearer tokens
//! silently with an interactive fallback, and call protected endpoints with one authorized GET.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod caller;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use parking_lot::Mutex;
	// self
	use crate::{
		auth::{AccessToken, AccountId, ScopeSet, Session},
		identity::{IdentityError, IdentityFuture, InteractiveAuthenticator},
	};

	/// Builds a signed-in session fixture for the provided account.
	pub fn test_session(account: &str) -> Session {
		Session::builder(AccountId::new(account).expect("Account fixture should be valid."))
			.claim("name", "Alice")
			.claim("preferred_username", "alice@example.com")
			.build()
	}

	/// Builds an access token fixture that stays valid for one hour.
	pub fn test_token(secret: &str, scopes: &ScopeSet) -> AccessToken {
		AccessToken::builder(scopes.clone())
			.secret(secret)
			.issued_now()
			.expires_in(Duration::hours(1))
			.build()
			.expect("Access token fixture should build.")
	}

	/// Scripted [`InteractiveAuthenticator`] that counts prompts and can be told to fail.
	#[derive(Debug, Default)]
	pub struct ScriptedAuthenticator {
		/// Number of interactive sign-in prompts served.
		pub sign_ins: AtomicUsize,
		/// Number of interactive token prompts served.
		pub authorizations: AtomicUsize,
		/// Provider error code returned by every prompt when set.
		pub fail_with: Mutex<Option<String>>,
	}
	impl ScriptedAuthenticator {
		/// Authenticator whose prompts fail with the provided provider code.
		pub fn failing(code: &str) -> Self {
			let authenticator = Self::default();

			*authenticator.fail_with.lock() = Some(code.into());

			authenticator
		}

		/// Returns the number of sign-in prompts served so far.
		pub fn sign_in_count(&self) -> usize {
			self.sign_ins.load(Ordering::SeqCst)
		}

		/// Returns the number of token prompts served so far.
		pub fn authorize_count(&self) -> usize {
			self.authorizations.load(Ordering::SeqCst)
		}

		fn scripted_failure(&self) -> Option<IdentityError> {
			self.fail_with
				.lock()
				.as_deref()
				.map(|code| IdentityError::classify(code, Some("Scripted prompt failure.")))
		}
	}
	impl InteractiveAuthenticator for ScriptedAuthenticator {
		fn sign_in(&self) -> IdentityFuture<'_, Session> {
			Box::pin(async move {
				self.sign_ins.fetch_add(1, Ordering::SeqCst);

				match self.scripted_failure() {
					Some(err) => Err(err),
					None => Ok(test_session("account-alice")),
				}
			})
		}

		fn authorize<'a>(&'a self, scopes: &'a ScopeSet) -> IdentityFuture<'a, AccessToken> {
			Box::pin(async move {
				let served = self.authorizations.fetch_add(1, Ordering::SeqCst) + 1;

				match self.scripted_failure() {
					Some(err) => Err(err),
					None => Ok(test_token(&format!("interactive-{served}"), scopes)),
				}
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
