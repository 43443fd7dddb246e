//! Transport primitives for provider calls.
//!
//! [`ProviderHttpClient`] is the adapter's only dependency on an HTTP stack. Every outbound
//! request (token exchange or resource-owner fetch) is expressed as an `oauth2`
//! [`HttpRequest`] and every reply is copied into a [`ProviderResponse`] so policy hooks and
//! errors never see transport-specific types.

// std
use std::{borrow::Cow, ops::Deref};
// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{HeaderMap, StatusCode},
};
// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing provider requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by
/// cloned clients. The handles they return own whatever state the request needs, so their
/// futures stay `Send` for the lifetime of the in-flight call.
///
/// A transport that honors URI user-info (as reqwest does) must turn it into an HTTP Basic
/// `Authorization` header; the FlexMLS token endpoint authenticates clients that way.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single provider call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Returns a handle ready to dispatch one request.
	fn handle(&self) -> Self::Handle;
}

/// Owned copy of a provider HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ProviderResponse {
	/// Creates a response without headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Lossy UTF-8 view of the body.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}

	/// Parses the body as JSON, falling back to the raw text as a JSON string.
	///
	/// Callers inspect the shape of the returned value; a non-JSON body therefore never fails
	/// here and is rejected later as an invalid response shape.
	pub fn parsed_body(&self) -> Value {
		serde_json::from_slice(&self.body).unwrap_or_else(|_| Value::String(self.text().into()))
	}
}
impl From<HttpResponse> for ProviderResponse {
	fn from(response: HttpResponse) -> Self {
		let (parts, body) = response.into_parts();

		Self { status: parts.status, headers: parts.headers, body }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Requests are rebuilt through [`ReqwestClient::request`], which moves URI user-info into a
/// Basic `Authorization` header. Configure any custom [`ReqwestClient`] to disable redirect
/// following; token endpoints return results directly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHttpClient {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let (parts, body) = request.into_parts();
			let url = Url::parse(&parts.uri.to_string()).map_err(|e| {
				HttpClientError::Other(format!("request URI `{}` is invalid: {e}", parts.uri))
			})?;
			let request = client
				.request(parts.method, url)
				.headers(parts.headers)
				.body(body)
				.build()
				.map_err(Box::new)?;
			let response = client.execute(request).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHttpClient;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		self.clone()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parsed_body_falls_back_to_text() {
		let response = ProviderResponse::new(StatusCode::BAD_GATEWAY, "<html>upstream</html>");

		assert_eq!(response.parsed_body(), Value::String("<html>upstream</html>".into()));
	}

	#[test]
	fn parsed_body_reads_json() {
		let response = ProviderResponse::new(StatusCode::OK, r#"{"D":{"Success":true}}"#);

		assert_eq!(response.parsed_body()["D"]["Success"], Value::Bool(true));
	}

	#[test]
	fn converts_from_oauth2_response() {
		let mut raw = HttpResponse::new(b"{}".to_vec());

		*raw.status_mut() = StatusCode::CREATED;

		let response = ProviderResponse::from(raw);

		assert_eq!(response.status, StatusCode::CREATED);
		assert_eq!(response.body, b"{}".to_vec());
	}
}
