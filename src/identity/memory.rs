//! In-process [`IdentityClient`] that caches the session and tokens locally.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet, Session},
	identity::{IdentityClient, IdentityError, IdentityFuture},
};

type TokenMap = Arc<RwLock<HashMap<String, AccessToken>>>;

/// Interactive half of an identity provider: the popup, redirect, or device prompt.
///
/// [`MemoryIdentityClient`] calls these hooks only when its cache cannot answer.
pub trait InteractiveAuthenticator
where
	Self: Send + Sync,
{
	/// Prompts the user to sign in.
	fn sign_in(&self) -> IdentityFuture<'_, Session>;

	/// Prompts the user to grant a token for `scopes`.
	fn authorize<'a>(&'a self, scopes: &'a ScopeSet) -> IdentityFuture<'a, AccessToken>;
}

/// Identity client that answers silent requests from memory and prompts through an
/// [`InteractiveAuthenticator`] otherwise.
///
/// Interactive operations are serialized by a single async guard, so concurrent sign-ins
/// coalesce: a caller that waited behind another prompt reuses the session it produced.
pub struct MemoryIdentityClient<A>
where
	A: ?Sized + InteractiveAuthenticator,
{
	authenticator: Arc<A>,
	session: Arc<RwLock<Option<Session>>>,
	tokens: TokenMap,
	interactive_guard: Arc<AsyncMutex<()>>,
	expiry_skew: Duration,
}
impl<A> MemoryIdentityClient<A>
where
	A: ?Sized + InteractiveAuthenticator,
{
	/// Tokens expiring within this window are treated as missing.
	pub const DEFAULT_EXPIRY_SKEW: Duration = Duration::seconds(60);

	/// Creates an empty client in front of `authenticator`.
	pub fn new(authenticator: Arc<A>) -> Self {
		Self {
			authenticator,
			session: Default::default(),
			tokens: Default::default(),
			interactive_guard: Default::default(),
			expiry_skew: Self::DEFAULT_EXPIRY_SKEW,
		}
	}

	/// Restores a previously established session.
	pub fn with_session(self, session: Session) -> Self {
		*self.session.write() = Some(session);

		self
	}

	/// Overrides the expiry skew; negative values clamp to zero.
	pub fn with_expiry_skew(mut self, skew: Duration) -> Self {
		self.expiry_skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	/// Seeds the token cache, replacing any token for the same scopes.
	pub fn insert_token(&self, token: AccessToken) {
		self.tokens.write().insert(token.scope.fingerprint(), token);
	}

	/// Number of cached tokens.
	pub fn cached_tokens(&self) -> usize {
		self.tokens.read().len()
	}

	fn lookup_now(&self, scopes: &ScopeSet) -> Result<AccessToken, IdentityError> {
		let now = OffsetDateTime::now_utc();
		let tokens = self.tokens.read();
		let usable = |token: &&AccessToken| token.is_usable_at(now, self.expiry_skew);

		let exact = tokens.get(&scopes.fingerprint());

		if let Some(token) = exact.filter(usable) {
			return Ok(token.clone());
		}

		tokens
			.values()
			.filter(|token| token.scope.covers(scopes))
			.find(usable)
			.cloned()
			.ok_or_else(|| match exact {
				Some(_) => IdentityError::interaction_required("Cached token has expired"),
				None => IdentityError::interaction_required(format!(
					"No cached token covers `{scopes}`"
				)),
			})
	}
}
impl<A> IdentityClient for MemoryIdentityClient<A>
where
	A: ?Sized + InteractiveAuthenticator,
{
	fn current_session(&self) -> Option<Session> {
		self.session.read().clone().filter(Session::is_valid)
	}

	fn sign_in_interactive(&self) -> IdentityFuture<'_, Session> {
		Box::pin(async move {
			let _prompt = self.interactive_guard.lock().await;

			if let Some(existing) = self.current_session() {
				return Ok(existing);
			}

			let session = self.authenticator.sign_in().await?;

			*self.session.write() = Some(session.clone());

			Ok(session)
		})
	}

	fn acquire_token_silent<'a>(&'a self, scopes: &'a ScopeSet) -> IdentityFuture<'a, AccessToken> {
		Box::pin(async move {
			if self.current_session().is_none() {
				return Err(IdentityError::interaction_required("No user is signed in"));
			}

			self.lookup_now(scopes)
		})
	}

	fn acquire_token_interactive<'a>(
		&'a self,
		scopes: &'a ScopeSet,
	) -> IdentityFuture<'a, AccessToken> {
		Box::pin(async move {
			let _prompt = self.interactive_guard.lock().await;
			let token = self.authenticator.authorize(scopes).await?;

			self.insert_token(token.clone());

			Ok(token)
		})
	}

	fn sign_out(&self) -> IdentityFuture<'_, ()> {
		Box::pin(async move {
			*self.session.write() = None;

			self.tokens.write().clear();

			Ok(())
		})
	}
}
impl<A> Debug for MemoryIdentityClient<A>
where
	A: ?Sized + InteractiveAuthenticator,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryIdentityClient")
			.field("signed_in", &self.session.read().is_some())
			.field("cached_tokens", &self.tokens.read().len())
			.field("expiry_skew", &self.expiry_skew)
			.finish()
	}
}
