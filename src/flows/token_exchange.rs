//! Token endpoint exchanges (authorization code and one-shot refresh).
//!
//! The engine builds the standard RFC 6749 form (credentials included) and hands it to
//! [`ProviderPolicy::prepare_token_request`](crate::provider::ProviderPolicy::prepare_token_request),
//! so the FlexMLS policy can move the client ID and secret into the URI user-info before the
//! request is dispatched. Responses go through the policy's error check and must be JSON
//! objects before they are read as a [`Token`].

// self
use crate::{
	_prelude::*,
	auth::Token,
	flows::{AuthorizationSession, ProviderClient, common},
	http::ProviderHttpClient,
	obs::{CallKind, CallSpan},
	provider::{TokenGrant, TokenRequest},
};

impl<C> ProviderClient<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Builds the token request for `grant` after the policy has customized it.
	pub fn token_request(&self, grant: &TokenGrant) -> Result<TokenRequest> {
		let mut form = BTreeMap::new();

		form.insert("grant_type".to_owned(), grant.as_str().to_owned());

		match grant {
			TokenGrant::AuthorizationCode { code, pkce_verifier } => {
				form.insert("code".to_owned(), code.clone());

				if let Some(redirect_uri) = &self.config.redirect_uri {
					form.insert("redirect_uri".to_owned(), redirect_uri.to_string());
				}
				if let Some(verifier) = pkce_verifier {
					form.insert("code_verifier".to_owned(), verifier.clone());
				}
			},
			TokenGrant::RefreshToken { refresh_token } => {
				form.insert("refresh_token".to_owned(), refresh_token.clone());
			},
		}

		form.insert("client_id".to_owned(), self.config.client_id.clone());

		if let Some(secret) = &self.config.client_secret {
			form.insert("client_secret".to_owned(), secret.expose().to_owned());
		}

		let request = TokenRequest {
			url: self.policy.token_url(grant)?,
			headers: self.policy.default_headers(),
			form,
		};

		self.policy.prepare_token_request(request, &self.config.credentials())
	}

	/// Exchanges an authorization code (and optional PKCE verifier) for a token.
	pub async fn exchange_code(&self, code: &str, pkce_verifier: Option<&str>) -> Result<Token> {
		let grant = TokenGrant::AuthorizationCode {
			code: code.to_owned(),
			pkce_verifier: pkce_verifier.map(str::to_owned),
		};

		common::observed(CallKind::TokenExchange, "exchange_code", |span| {
			self.exchange(grant, span)
		})
		.await
	}

	/// Validates the redirect `state` against `session`, then exchanges `code`.
	///
	/// The session's PKCE verifier, if any, is sent along with the code. A mismatched state
	/// fails before any request is made.
	pub async fn complete_authorization(
		&self,
		session: &AuthorizationSession,
		returned_state: &str,
		code: &str,
	) -> Result<Token> {
		common::observed(CallKind::TokenExchange, "complete_authorization", |span| async move {
			session.validate_state(returned_state)?;

			let grant = TokenGrant::AuthorizationCode {
				code: code.to_owned(),
				pkce_verifier: session.pkce_verifier().map(str::to_owned),
			};

			self.exchange(grant, span).await
		})
		.await
	}

	/// Performs a single `grant_type=refresh_token` exchange.
	///
	/// Nothing is cached or rotated; callers decide when to refresh and keep the result.
	pub async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<Token> {
		let grant = TokenGrant::refresh_token(refresh_token);

		common::observed(CallKind::TokenExchange, "exchange_refresh_token", |span| {
			self.exchange(grant, span)
		})
		.await
	}

	async fn exchange(&self, grant: TokenGrant, span: CallSpan) -> Result<Token> {
		let request = self.token_request(&grant)?.into_http_request()?;
		let response = common::dispatch(self.http_client.as_ref(), request).await?;
		let status = response.status.as_u16();

		span.record_status(status);

		let body =
			common::checked_body(self.policy.as_ref(), &response, common::TOKEN_ENDPOINT_LABEL)?;

		Token::from_response(body, OffsetDateTime::now_utc())
			.map_err(|source| Error::TokenResponseParse { source, status })
	}
}
