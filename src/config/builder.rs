// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet},
	config::{ApiTarget, AppConfig},
	error::ConfigError,
};

/// Builder for [`AppConfig`] values.
#[derive(Debug)]
pub struct AppConfigBuilder {
	/// Application identifier registered with the provider.
	pub client_id: ClientId,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
	/// Optional authority override.
	pub authority: Option<Url>,
	/// Optional API endpoint override.
	pub endpoint: Option<Url>,
	/// Optional API scope override.
	pub scopes: Option<ScopeSet>,
}
impl AppConfigBuilder {
	/// Creates a new builder seeded with the registration values.
	pub fn new(client_id: ClientId, redirect_uri: Url) -> Self {
		Self { client_id, redirect_uri, authority: None, endpoint: None, scopes: None }
	}

	/// Overrides the sign-in authority.
	pub fn authority(mut self, url: Url) -> Self {
		self.authority = Some(url);

		self
	}

	/// Overrides the protected API endpoint.
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Overrides the scopes requested for the API.
	pub fn scopes<I, S>(mut self, scopes: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = Some(ScopeSet::new(scopes)?);

		Ok(self)
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<AppConfig, ConfigError> {
		let default_api = ApiTarget::default();
		let api = ApiTarget {
			endpoint: self.endpoint.unwrap_or(default_api.endpoint),
			scopes: self.scopes.unwrap_or(default_api.scopes),
		};
		let config = AppConfig {
			client_id: self.client_id,
			redirect_uri: self.redirect_uri,
			authority: match self.authority {
				Some(authority) => authority,
				None => Url::parse(super::DEFAULT_AUTHORITY)
					.expect("Default authority is a valid URL."),
			},
			api,
		};

		config.validate()?;

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn client_id() -> ClientId {
		ClientId::new("6226576d-37e9-49eb-b201-ec1eeb0029b6").expect("Client fixture should be valid.")
	}

	#[test]
	fn builder_applies_overrides() {
		let config = AppConfig::builder(
			client_id(),
			Url::parse("http://localhost:30662/").expect("Redirect fixture should parse."),
		)
		.endpoint(Url::parse("https://api.example.com/v1/profile").expect("Endpoint should parse."))
		.scopes(["api://example/profile.read"])
		.expect("Scope override should be valid.")
		.build()
		.expect("Configuration should validate.");

		assert_eq!(config.api.endpoint.as_str(), "https://api.example.com/v1/profile");
		assert!(config.api.scopes.contains("api://example/profile.read"));
		assert_eq!(config.authority.as_str(), super::super::DEFAULT_AUTHORITY);
	}

	#[test]
	fn builder_rejects_insecure_endpoint_and_redirect() {
		let err = AppConfig::builder(
			client_id(),
			Url::parse("http://localhost/").expect("Redirect fixture should parse."),
		)
		.endpoint(Url::parse("http://api.example.com/").expect("Endpoint should parse."))
		.build()
		.expect_err("Plain-HTTP endpoints should be rejected.");

		assert!(matches!(err, ConfigError::InsecureUrl { field: "API endpoint", .. }));

		let err = AppConfig::builder(
			client_id(),
			Url::parse("ftp://localhost/").expect("Redirect fixture should parse."),
		)
		.build()
		.expect_err("Non-HTTP redirects should be rejected.");

		assert!(matches!(err, ConfigError::InsecureUrl { field: "redirect", .. }));
	}

	#[test]
	fn empty_scope_override_is_rejected() {
		let err = AppConfig::builder(
			client_id(),
			Url::parse("http://localhost/").expect("Redirect fixture should parse."),
		)
		.scopes(Vec::<String>::new())
		.expect("An empty set is a valid scope set.")
		.build()
		.expect_err("Empty scopes should fail validation.");

		assert!(matches!(err, ConfigError::EmptyScopes));
	}
}
