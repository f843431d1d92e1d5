// std
use std::{fs, path::PathBuf};
// self
use token_gated_api::{
	config::{AppConfig, DEFAULT_API_ENDPOINT, DEFAULT_API_SCOPE, DEFAULT_AUTHORITY},
	error::ConfigError,
};

fn write_config(name: &str, contents: &str) -> PathBuf {
	let path = std::env::temp_dir().join(format!("token-gated-api-{}-{name}.json", std::process::id()));

	fs::write(&path, contents).expect("Temporary configuration file should be writable.");

	path
}

#[test]
fn loads_provider_style_file_with_defaults() {
	let path = write_config(
		"provider-style",
		r#"{
			"clientID": "6226576d-37e9-49eb-b201-ec1eeb0029b6",
			"redirectUri": "http://localhost:30662/"
		}"#,
	);
	let config = AppConfig::from_path(&path).expect("Provider-style configuration should load.");

	fs::remove_file(&path).expect("Temporary configuration file should be removable.");

	assert_eq!(config.client_id.as_ref(), "6226576d-37e9-49eb-b201-ec1eeb0029b6");
	assert_eq!(config.authority.as_str(), DEFAULT_AUTHORITY);
	assert_eq!(config.api.endpoint.as_str(), DEFAULT_API_ENDPOINT);
	assert!(config.api.scopes.contains(DEFAULT_API_SCOPE));
}

#[test]
fn loads_custom_api_target() {
	let path = write_config(
		"custom-target",
		r#"{
			"client_id": "contoso-web",
			"redirect_uri": "https://app.contoso.com/auth",
			"authority": "https://login.microsoftonline.com/contoso.onmicrosoft.com",
			"api": {
				"endpoint": "https://graph.microsoft.com/v1.0/me/messages",
				"scopes": ["https://graph.microsoft.com/mail.read", "https://graph.microsoft.com/user.read"]
			}
		}"#,
	);
	let config = AppConfig::from_path(&path).expect("Custom configuration should load.");

	fs::remove_file(&path).expect("Temporary configuration file should be removable.");

	assert_eq!(config.api.endpoint.path(), "/v1.0/me/messages");
	assert_eq!(config.api.scopes.len(), 2);
	assert_eq!(
		config.authority.as_str(),
		"https://login.microsoftonline.com/contoso.onmicrosoft.com"
	);
}

#[test]
fn rejects_malformed_and_invalid_configuration() {
	let err = AppConfig::from_json_str(r#"{"clientID": "", "redirectUri": "http://localhost/"}"#)
		.expect_err("Empty client identifiers should be rejected.");

	assert!(matches!(err, ConfigError::Parse { .. }));
	assert!(err.to_string().contains("clientID") || err.to_string().contains("client_id"));

	let err = AppConfig::from_json_str(r#"{"clientID": "app"}"#)
		.expect_err("Missing redirect URIs should be rejected.");

	assert!(matches!(err, ConfigError::Parse { .. }));

	let err = AppConfig::from_json_str(
		r#"{"clientID": "app", "redirectUri": "http://localhost/", "api": {"endpoint": "http://graph.example.com/me", "scopes": ["user.read"]}}"#,
	)
	.expect_err("Plain-HTTP API endpoints should be rejected.");

	assert!(matches!(err, ConfigError::InsecureUrl { field: "API endpoint", .. }));
}
