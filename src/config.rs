//! Application configuration: client registration, redirect URI, authority, and API target.
//!
//! JSON keys accept the identity provider's conventional spelling (`clientID`,
//! `redirectUri`) as well as snake_case. Parsing errors carry the JSON path of the offending
//! field.

/// Builder API for assembling validated configurations.
pub mod builder;

pub use builder::*;

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet},
	error::ConfigError,
};

/// Default sign-in authority (multi-tenant + personal accounts).
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/common";
/// Default protected API endpoint (signed-in user profile).
pub const DEFAULT_API_ENDPOINT: &str = "https://graph.microsoft.com/v1.0/me";
/// Default scope requested for [`DEFAULT_API_ENDPOINT`].
pub const DEFAULT_API_SCOPE: &str = "https://graph.microsoft.com/user.read";

/// Protected endpoint plus the scopes its token must carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTarget {
	/// Endpoint receiving the authorized GET.
	pub endpoint: Url,
	/// Scopes requested for the bearer token.
	pub scopes: ScopeSet,
}
impl ApiTarget {
	/// Creates a target for `endpoint` requiring `scopes`.
	pub fn new(endpoint: Url, scopes: ScopeSet) -> Self {
		Self { endpoint, scopes }
	}
}
impl Default for ApiTarget {
	fn default() -> Self {
		Self {
			endpoint: Url::parse(DEFAULT_API_ENDPOINT).expect("Default API endpoint is a valid URL."),
			scopes: ScopeSet::new([DEFAULT_API_SCOPE]).expect("Default API scope is valid."),
		}
	}
}

/// Validated application configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
	/// Application identifier registered with the provider.
	#[serde(alias = "clientID", alias = "clientId")]
	pub client_id: ClientId,
	/// URL the provider returns to after authentication.
	#[serde(alias = "redirectUri")]
	pub redirect_uri: Url,
	/// Sign-in authority.
	///
	/// Handed to the identity client by whoever constructs it, and to
	/// [`TokenGatedApiCaller::with_authority`](crate::caller::TokenGatedApiCaller::with_authority)
	/// so sign-in failures name it.
	#[serde(default = "default_authority")]
	pub authority: Url,
	/// Protected API called after sign-in.
	#[serde(default)]
	pub api: ApiTarget,
}
impl AppConfig {
	/// Returns a builder seeded with the provided client identifier.
	pub fn builder(client_id: ClientId, redirect_uri: Url) -> AppConfigBuilder {
		AppConfigBuilder::new(client_id, redirect_uri)
	}

	/// Parses and validates configuration from a JSON string.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let config: Self = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Reads, parses, and validates configuration from a JSON file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;

		Self::from_json_str(&raw)
	}

	/// Checks scheme and scope invariants.
	pub fn validate(&self) -> Result<(), ConfigError> {
		require_scheme("redirect", &self.redirect_uri, &["http", "https"], "http or https")?;
		require_scheme("authority", &self.authority, &["https"], "https")?;
		require_scheme("API endpoint", &self.api.endpoint, &["https"], "https")?;

		if self.api.scopes.is_empty() {
			return Err(ConfigError::EmptyScopes);
		}

		Ok(())
	}
}

fn default_authority() -> Url {
	Url::parse(DEFAULT_AUTHORITY).expect("Default authority is a valid URL.")
}

fn require_scheme(
	field: &'static str,
	url: &Url,
	allowed: &[&str],
	expected: &'static str,
) -> Result<(), ConfigError> {
	if allowed.contains(&url.scheme()) {
		Ok(())
	} else {
		Err(ConfigError::InsecureUrl { field, expected, url: url.to_string() })
	}
}
