//! Authorization URL construction and redirect state handling.

// crates.io
use oauth2::{CsrfToken, PkceCodeChallenge};
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenSecret},
	error::ConfigError,
	flows::ProviderClient,
	http::ProviderHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Authorization Code handshake metadata returned by [`ProviderClient::start_authorization`].
#[derive(Clone)]
pub struct AuthorizationSession {
	/// Fully-formed authorize URL that callers should send end-users to.
	pub authorize_url: Url,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	/// Scopes requested in the URL (caller scopes merged with provider defaults).
	pub scope: ScopeSet,
	/// Redirect URI supplied in the authorize URL.
	pub redirect_uri: Url,
	pkce: Option<PkcePair>,
}
impl AuthorizationSession {
	/// PKCE code challenge sent in the authorize URL, when PKCE is enabled.
	pub fn code_challenge(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.challenge.as_str())
	}

	/// PKCE verifier to present at the token endpoint, when PKCE is enabled.
	pub fn pkce_verifier(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.verifier.expose())
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("authorize_url", &self.authorize_url.as_str())
			.field("state", &self.state)
			.field("scope", &self.scope)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("code_challenge", &self.code_challenge())
			.finish()
	}
}

#[derive(Clone)]
struct PkcePair {
	verifier: TokenSecret,
	challenge: String,
}
impl PkcePair {
	fn generate() -> Self {
		let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();

		Self {
			verifier: TokenSecret::new(verifier.secret().as_str()),
			challenge: challenge.as_str().to_owned(),
		}
	}
}

impl<C> ProviderClient<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Base authorization endpoint of the configured policy.
	pub fn authorization_url(&self) -> Result<Url> {
		self.policy.authorization_url()
	}

	/// Builds the authorize URL for `scopes` merged with the provider's default scopes.
	///
	/// A fresh random `state` is generated per call. When [`ClientConfig::pkce`] is set, an
	/// S256 challenge is appended and its verifier is kept in the returned session.
	///
	/// [`ClientConfig::pkce`]: crate::config::ClientConfig::pkce
	pub fn start_authorization(&self, scopes: &ScopeSet) -> Result<AuthorizationSession> {
		const KIND: CallKind = CallKind::Authorization;

		let span = CallSpan::new(KIND, "start_authorization");
		let _guard = span.entered();

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = self.build_session(scopes);

		obs::finish_call(KIND, &span, &result);

		result
	}

	fn build_session(&self, scopes: &ScopeSet) -> Result<AuthorizationSession> {
		let redirect_uri =
			self.config.redirect_uri.clone().ok_or(ConfigError::MissingRedirectUri)?;
		let scope = scopes.union(&self.policy.default_scopes());
		let state = CsrfToken::new_random().secret().to_owned();
		let pkce = self.config.pkce.then(PkcePair::generate);
		let mut authorize_url = self.policy.authorization_url()?;

		{
			let mut pairs = authorize_url.query_pairs_mut();

			pairs.append_pair("response_type", "code");
			pairs.append_pair("client_id", &self.config.client_id);
			pairs.append_pair("redirect_uri", redirect_uri.as_str());

			if let Some(value) = scope.join(self.policy.scope_delimiter()) {
				pairs.append_pair("scope", &value);
			}

			pairs.append_pair("state", &state);

			if let Some(pkce) = &pkce {
				pairs.append_pair("code_challenge", &pkce.challenge);
				pairs.append_pair("code_challenge_method", "S256");
			}
		}

		Ok(AuthorizationSession { authorize_url, state, scope, redirect_uri, pkce })
	}
}
