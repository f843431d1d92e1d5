//! Identity client contract consumed by the caller.
//!
//! [`IdentityClient`] is the only seam between this crate and an identity provider SDK. The
//! provider owns sign-in protocols, token caching, and refresh; the caller only asks for a
//! session and a token, silently first and interactively when that fails.
//! [`MemoryIdentityClient`] is an in-process implementation that keeps the session and token
//! cache locally and delegates prompts to an [`InteractiveAuthenticator`].

pub mod error;
pub mod memory;

pub use error::*;
pub use memory::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet, Session},
};

/// Boxed future returned by identity operations.
pub type IdentityFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, IdentityError>> + 'a + Send>>;

/// Identity provider capability: session lookup, sign-in, token acquisition, sign-out.
///
/// Implementations must be `Send + Sync` and return `Send` futures so callers can share
/// them behind `Arc` across executor threads.
pub trait IdentityClient
where
	Self: Send + Sync,
{
	/// Returns the currently signed-in session, if any, without user interaction.
	fn current_session(&self) -> Option<Session>;

	/// Runs the provider's interactive sign-in (popup, redirect, device prompt).
	fn sign_in_interactive(&self) -> IdentityFuture<'_, Session>;

	/// Acquires a token without user interaction; fails fast on cache miss or consent issues.
	fn acquire_token_silent<'a>(&'a self, scopes: &'a ScopeSet) -> IdentityFuture<'a, AccessToken>;

	/// Acquires a token with user interaction.
	fn acquire_token_interactive<'a>(
		&'a self,
		scopes: &'a ScopeSet,
	) -> IdentityFuture<'a, AccessToken>;

	/// Signs the user out and clears the session.
	fn sign_out(&self) -> IdentityFuture<'_, ()>;
}
