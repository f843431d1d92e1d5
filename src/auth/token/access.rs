//! Scoped, expiring access tokens and their builder.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, token::secret::TokenSecret},
};

/// Header name carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// Lifecycle status of an access token at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Issued-at instant is still in the future.
	Pending,
	/// Token is currently valid.
	Active,
	/// Token reached its expiry instant.
	Expired,
}

/// Errors produced by [`AccessTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccessTokenBuilderError {
	/// No secret value was provided.
	#[error("Access token secret is required.")]
	MissingSecret,
	/// No expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Bearer credential scoped to a set of permissions.
///
/// Expiry is owned by the identity client that minted the token; callers only read it.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Credential value; redacted when formatted.
	pub secret: TokenSecret,
	/// Scopes the token was granted for.
	pub scope: ScopeSet,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Returns a builder for a token granted for `scope`.
	pub fn builder(scope: ScopeSet) -> AccessTokenBuilder {
		AccessTokenBuilder { scope, secret: None, issued_at: None, expires_at: None, expires_in: None }
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant < self.issued_at {
			return TokenStatus::Pending;
		}
		if instant >= self.expires_at {
			return TokenStatus::Expired;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the token is active at `instant` and stays active for at least `skew`.
	pub fn is_usable_at(&self, instant: OffsetDateTime, skew: Duration) -> bool {
		matches!(self.status_at(instant), TokenStatus::Active) && self.expires_at - instant > skew
	}

	/// Returns `true` if the token has expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		matches!(self.status_at(OffsetDateTime::now_utc()), TokenStatus::Expired)
	}

	/// Header pair that authorizes an outbound request with this token.
	pub fn authorization_header(&self) -> (String, String) {
		(AUTHORIZATION.to_owned(), self.secret.bearer())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`AccessToken`].
#[derive(Clone, Debug)]
pub struct AccessTokenBuilder {
	scope: ScopeSet,
	secret: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl AccessTokenBuilder {
	/// Provides the credential value.
	pub fn secret(mut self, value: impl Into<String>) -> Self {
		self.secret = Some(TokenSecret::new(value));

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Stamps `issued_at` with the current clock.
	pub fn issued_now(self) -> Self {
		self.issued_at(OffsetDateTime::now_utc())
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces an [`AccessToken`].
	pub fn build(self) -> Result<AccessToken, AccessTokenBuilderError> {
		let secret = self.secret.ok_or(AccessTokenBuilderError::MissingSecret)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(AccessTokenBuilderError::MissingExpiry),
		};

		Ok(AccessToken { secret, scope: self.scope, issued_at, expires_at })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn scope() -> ScopeSet {
		ScopeSet::new(["https://graph.microsoft.com/user.read"])
			.expect("Scope fixture should be valid.")
	}

	#[test]
	fn status_and_skew() {
		let token = AccessToken::builder(scope())
			.secret("at")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::hours(1))
			.build()
			.expect("Token should build with relative expiry.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 01:00 UTC));
		assert_eq!(token.status_at(macros::datetime!(2024-12-31 23:59 UTC)), TokenStatus::Pending);
		assert_eq!(token.status_at(macros::datetime!(2025-01-01 00:30 UTC)), TokenStatus::Active);
		assert_eq!(token.status_at(macros::datetime!(2025-01-01 01:00 UTC)), TokenStatus::Expired);
		assert!(token.is_usable_at(macros::datetime!(2025-01-01 00:58 UTC), Duration::seconds(60)));
		assert!(!token.is_usable_at(macros::datetime!(2025-01-01 00:59:30 UTC), Duration::seconds(60)));
	}

	#[test]
	fn builder_requires_secret_and_expiry() {
		assert_eq!(
			AccessToken::builder(scope()).expires_in(Duration::minutes(5)).build().err(),
			Some(AccessTokenBuilderError::MissingSecret)
		);
		assert_eq!(
			AccessToken::builder(scope()).secret("at").build().err(),
			Some(AccessTokenBuilderError::MissingExpiry)
		);
	}

	#[test]
	fn header_and_debug() {
		let token = AccessToken::builder(scope())
			.secret("eyJ0eXAi")
			.issued_now()
			.expires_in(Duration::minutes(5))
			.build()
			.expect("Token should build.");

		assert_eq!(token.authorization_header(), ("Authorization".into(), "Bearer eyJ0eXAi".into()));
		assert!(!format!("{token:?}").contains("eyJ0eXAi"));
		assert!(!token.is_expired());
	}
}
