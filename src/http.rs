//! Transport primitives for the protected API call.
//!
//! [`HttpFetcher`] is the crate's only dependency on an HTTP stack. The caller hands it a
//! URL plus header pairs and receives an [`HttpResponse`] with the status, lower-cased
//! headers, and the raw body; interpretation of the body stays in the caller.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpFetcher::get`].
pub type FetchFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Generic HTTP client capability used for the authorized GET.
///
/// Implementations must be `'static + Send + Sync` so one fetcher can be shared by many
/// callers. Only transport failures are errors; every HTTP status, including 4xx/5xx, is
/// returned as a response.
pub trait HttpFetcher
where
	Self: 'static + Send + Sync,
{
	/// Issues a GET request to `url` with the provided header pairs.
	fn get<'a>(&'a self, url: &'a Url, headers: &'a [(String, String)]) -> FetchFuture<'a>;
}

/// Response returned by an [`HttpFetcher`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers keyed by lower-cased name.
	pub headers: BTreeMap<String, String>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response with the provided status and body and no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Adds a header, normalizing its name to lower case.
	pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.insert(name.to_ascii_lowercase(), value.into());

		self
	}

	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// The `content-type` header, if present.
	pub fn content_type(&self) -> Option<&str> {
		self.header("content-type")
	}

	/// Returns `true` when the content type declares a JSON body.
	pub fn is_json(&self) -> bool {
		self.content_type().is_some_and(|value| value.contains("application/json"))
	}
}

/// Thin wrapper around [`ReqwestClient`] implementing [`HttpFetcher`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpFetcher(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpFetcher {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpFetcher {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpFetcher for ReqwestHttpFetcher {
	fn get<'a>(&'a self, url: &'a Url, headers: &'a [(String, String)]) -> FetchFuture<'a> {
		Box::pin(async move {
			let mut request = self.0.get(url.clone());

			for (name, value) in headers {
				request = request.header(name.as_str(), value.as_str());
			}

			let response = request.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, headers, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_lookup_ignores_case() {
		let response = HttpResponse::new(200, "{}")
			.with_header("Content-Type", "application/json; charset=utf-8");

		assert_eq!(response.header("content-type"), Some("application/json; charset=utf-8"));
		assert_eq!(response.header("CONTENT-TYPE"), response.content_type());
		assert!(response.is_json());
	}

	#[test]
	fn missing_or_other_content_type_is_not_json() {
		assert!(!HttpResponse::new(200, "{}").is_json());
		assert!(!HttpResponse::new(200, "<html/>").with_header("content-type", "text/html").is_json());
	}
}
