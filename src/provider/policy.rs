//! Policy hooks that shape every provider call.
//!
//! Implementations supply endpoints, default scopes and headers, customize outgoing token
//! requests, and detect provider error envelopes without tying the engine to any particular
//! HTTP client.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use percent_encoding::percent_decode_str;
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Token},
	config::ClientCredentials,
	error::{ConfigError, IdentityProviderError},
	http::ProviderResponse,
};

/// Capability interface consumed by [`ProviderClient`](crate::flows::ProviderClient).
///
/// Implementors are required to be `Send + Sync` and only see crate-owned data types, so
/// policies never depend on reqwest-specific structures. Override only what you need; the
/// URL providers and [`check_response`](Self::check_response) are the required hooks.
pub trait ProviderPolicy: Send + Sync {
	/// Base authorization endpoint (before query parameters are appended).
	fn authorization_url(&self) -> Result<Url>;

	/// Token endpoint for the given grant.
	fn token_url(&self, grant: &TokenGrant) -> Result<Url>;

	/// Resource-owner (account profile) endpoint for the given token.
	fn resource_owner_details_url(&self, token: &Token) -> Result<Url>;

	/// Scopes merged into every authorization request.
	fn default_scopes(&self) -> ScopeSet {
		ScopeSet::default()
	}

	/// Character used to join scopes in the `scope` parameter.
	fn scope_delimiter(&self) -> char {
		' '
	}

	/// Headers attached to every outbound request.
	fn default_headers(&self) -> BTreeMap<String, String> {
		BTreeMap::new()
	}

	/// Customizes the standard token request before it is dispatched.
	///
	/// The engine hands over a request that carries the client credentials as form
	/// parameters. The default implementation sends it unchanged.
	fn prepare_token_request(
		&self,
		request: TokenRequest,
		_credentials: &ClientCredentials,
	) -> Result<TokenRequest> {
		Ok(request)
	}

	/// Inspects a parsed response body and fails when it carries a provider error.
	///
	/// Runs after every token exchange and resource-owner response, before data reaches the
	/// caller.
	fn check_response(
		&self,
		response: &ProviderResponse,
		body: &Value,
	) -> Result<(), IdentityProviderError>;
}

/// Grant submitted to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum TokenGrant {
	/// Authorization Code grant, optionally proven with a PKCE verifier.
	AuthorizationCode {
		/// One-time code returned to the redirect URI.
		code: String,
		/// PKCE verifier matching the challenge sent in the authorization URL.
		pkce_verifier: Option<String>,
	},
	/// Refresh Token grant for a single, caller-initiated refresh.
	RefreshToken {
		/// Refresh token issued by a previous exchange.
		refresh_token: String,
	},
}
impl TokenGrant {
	/// Authorization Code grant without PKCE.
	pub fn authorization_code(code: impl Into<String>) -> Self {
		Self::AuthorizationCode { code: code.into(), pkce_verifier: None }
	}

	/// Refresh Token grant.
	pub fn refresh_token(refresh_token: impl Into<String>) -> Self {
		Self::RefreshToken { refresh_token: refresh_token.into() }
	}

	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AuthorizationCode { .. } => "authorization_code",
			Self::RefreshToken { .. } => "refresh_token",
		}
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant").field("grant_type", &self.as_str()).finish()
	}
}
impl Display for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token endpoint request in transport-neutral form.
///
/// The form is kept as a `BTreeMap` so policies can move or rewrite parameters before the
/// request is encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRequest {
	/// Token endpoint, possibly carrying client credentials as user-info.
	pub url: Url,
	/// Headers sent with the request (in addition to content negotiation headers).
	pub headers: BTreeMap<String, String>,
	/// `application/x-www-form-urlencoded` parameters.
	pub form: BTreeMap<String, String>,
}
impl TokenRequest {
	/// Returns the percent-decoded `user[:password]` carried by the URL, if any.
	///
	/// This is the `C:S` pair a server sees after decoding the `Authorization: Basic` header
	/// that transports derive from the user-info component.
	pub fn user_info(&self) -> Option<String> {
		let decode = |raw: &str| percent_decode_str(raw).decode_utf8_lossy().into_owned();

		if self.url.username().is_empty() {
			return None;
		}

		let username = decode(self.url.username());

		Some(match self.url.password() {
			Some(password) => format!("{username}:{}", decode(password)),
			None => username,
		})
	}

	/// Encodes the form parameters as a request body.
	pub fn encoded_form(&self) -> String {
		let mut serializer = Serializer::new(String::new());

		serializer.extend_pairs(self.form.iter());

		serializer.finish()
	}

	/// Converts the request into an `oauth2` [`HttpRequest`] ready for dispatch.
	pub fn into_http_request(self) -> Result<HttpRequest> {
		let mut builder = Request::builder()
			.method(Method::POST)
			.uri(self.url.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json");

		for (name, value) in &self.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		builder.body(self.encoded_form().into_bytes()).map_err(|e| ConfigError::from(e).into())
	}
}
impl Debug for TokenRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut url = self.url.clone();

		if url.password().is_some() {
			let _ = url.set_password(Some("<redacted>"));
		}

		let form = self
			.form
			.iter()
			.map(|(key, value)| match key.as_str() {
				"client_secret" | "code" | "code_verifier" | "refresh_token" =>
					(key.as_str(), "<redacted>"),
				_ => (key.as_str(), value.as_str()),
			})
			.collect::<BTreeMap<_, _>>();

		f.debug_struct("TokenRequest")
			.field("url", &url.as_str())
			.field("headers", &self.headers)
			.field("form", &form)
			.finish()
	}
}
