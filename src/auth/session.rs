//! Signed-in session snapshot returned by identity clients.

// self
use crate::{_prelude::*, auth::AccountId};

/// Current signed-in identity held by an identity client.
///
/// Sessions are plain values: identity clients hand out clones and keep the
/// authoritative copy themselves, so callers never observe ambient global state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Account identifier reported by the provider.
	pub account: AccountId,
	/// Identity claims (name, preferred username, tenant, ...).
	#[serde(default)]
	pub claims: BTreeMap<String, String>,
	/// Instant after which the provider no longer honors the session.
	#[serde(default)]
	pub expires_at: Option<OffsetDateTime>,
}
impl Session {
	/// Returns a builder for the provided account.
	pub fn builder(account: AccountId) -> SessionBuilder {
		SessionBuilder { account, claims: BTreeMap::new(), expires_at: None }
	}

	/// Returns a claim value by name.
	pub fn claim(&self, name: &str) -> Option<&str> {
		self.claims.get(name).map(String::as_str)
	}

	/// Display name claim.
	pub fn name(&self) -> Option<&str> {
		self.claim("name")
	}

	/// Sign-in name claim.
	pub fn username(&self) -> Option<&str> {
		self.claim("preferred_username")
	}

	/// Returns `true` if the session is still valid at the provided instant.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_none_or(|expiry| instant < expiry)
	}

	/// Returns `true` if the session is valid right now.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}

/// Builder for [`Session`].
#[derive(Clone, Debug)]
pub struct SessionBuilder {
	account: AccountId,
	claims: BTreeMap<String, String>,
	expires_at: Option<OffsetDateTime>,
}
impl SessionBuilder {
	/// Adds or replaces a claim.
	pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.claims.insert(name.into(), value.into());

		self
	}

	/// Sets the session expiry.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Consumes the builder.
	pub fn build(self) -> Session {
		Session { account: self.account, claims: self.claims, expires_at: self.expires_at }
	}
}
