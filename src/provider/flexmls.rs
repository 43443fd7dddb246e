//! FlexMLS / Spark Platform request policy.
//!
//! Spark authenticates clients at the token endpoint through the token URI's user-info
//! component instead of form parameters, identifies callers through a pair of agent headers,
//! and reports failures with an `{"error", "error_description", "error_uri"}` envelope on both
//! the token and account endpoints.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Token},
	config::{ClientConfig, ClientCredentials, DEFAULT_USER_AGENT},
	error::{AuthErrorEnvelope, ConfigError, IdentityProviderError},
	http::ProviderResponse,
	provider::{ProviderPolicy, TokenGrant, TokenRequest},
};

/// Spark Platform OpenID authorization endpoint.
pub const AUTHORIZATION_ENDPOINT: &str = "https://sparkplatform.com/openid/authorize";
/// Spark Platform OpenID token endpoint.
pub const TOKEN_ENDPOINT: &str = "https://sparkplatform.com/openid/token";
/// Spark API account endpoint describing the resource owner.
pub const RESOURCE_OWNER_ENDPOINT: &str = "https://sparkapi.com/v1/my/account";
/// Provider-specific agent header mirrored from `User-Agent`.
pub const SPARK_USER_AGENT_HEADER: &str = "X-SparkApi-User-Agent";

/// Endpoint set used by [`FlexMlsPolicy`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint used by the Authorization Code flow.
	pub authorization: Url,
	/// Token endpoint used for code and refresh exchanges.
	pub token: Url,
	/// Account endpoint returning the resource-owner profile.
	pub resource_owner: Url,
}
impl ProviderEndpoints {
	/// Production FlexMLS / Spark Platform endpoints.
	pub fn flexmls() -> Result<Self, ConfigError> {
		Ok(Self {
			authorization: parse_endpoint(AUTHORIZATION_ENDPOINT)?,
			token: parse_endpoint(TOKEN_ENDPOINT)?,
			resource_owner: parse_endpoint(RESOURCE_OWNER_ENDPOINT)?,
		})
	}
}

/// Request policy for the FlexMLS / Spark Platform identity provider.
///
/// Without overrides the production endpoints are resolved on every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlexMlsPolicy {
	endpoints: Option<ProviderEndpoints>,
	user_agent: String,
}
impl FlexMlsPolicy {
	/// Creates a policy that identifies requests with `user_agent`.
	pub fn new(user_agent: impl Into<String>) -> Self {
		Self { endpoints: None, user_agent: user_agent.into() }
	}

	/// Creates a policy using the agent string from `config`.
	pub fn from_config(config: &ClientConfig) -> Self {
		Self::new(config.user_agent())
	}

	/// Replaces the endpoint set (sandbox deployments, mock servers).
	pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
		self.endpoints = Some(endpoints);

		self
	}

	/// Endpoint overrides, if any were installed.
	pub fn endpoint_overrides(&self) -> Option<&ProviderEndpoints> {
		self.endpoints.as_ref()
	}

	/// Agent string sent in both agent headers.
	pub fn user_agent(&self) -> &str {
		&self.user_agent
	}

	fn endpoint<F>(&self, select: F, production: &'static str) -> Result<Url>
	where
		F: Fn(&ProviderEndpoints) -> &Url,
	{
		match &self.endpoints {
			Some(endpoints) => Ok(select(endpoints).clone()),
			None => parse_endpoint(production).map_err(Error::from),
		}
	}
}
impl Default for FlexMlsPolicy {
	fn default() -> Self {
		Self::new(DEFAULT_USER_AGENT)
	}
}
impl ProviderPolicy for FlexMlsPolicy {
	fn authorization_url(&self) -> Result<Url> {
		self.endpoint(|endpoints| &endpoints.authorization, AUTHORIZATION_ENDPOINT)
	}

	fn token_url(&self, _grant: &TokenGrant) -> Result<Url> {
		self.endpoint(|endpoints| &endpoints.token, TOKEN_ENDPOINT)
	}

	fn resource_owner_details_url(&self, _token: &Token) -> Result<Url> {
		self.endpoint(|endpoints| &endpoints.resource_owner, RESOURCE_OWNER_ENDPOINT)
	}

	fn default_scopes(&self) -> ScopeSet {
		ScopeSet::openid()
	}

	fn default_headers(&self) -> BTreeMap<String, String> {
		BTreeMap::from([
			("User-Agent".to_owned(), self.user_agent.clone()),
			(SPARK_USER_AGENT_HEADER.to_owned(), self.user_agent.clone()),
		])
	}

	fn prepare_token_request(
		&self,
		mut request: TokenRequest,
		credentials: &ClientCredentials,
	) -> Result<TokenRequest> {
		let endpoint = request.url.to_string();
		let placement_error = || ConfigError::CredentialPlacement { url: endpoint.clone() };

		request.form.remove("client_id");
		request.form.remove("client_secret");
		request.url.set_username(&credentials.client_id).map_err(|_| placement_error())?;
		request
			.url
			.set_password(credentials.client_secret.as_ref().map(|secret| secret.expose()))
			.map_err(|_| placement_error())?;

		Ok(request)
	}

	fn check_response(
		&self,
		response: &ProviderResponse,
		body: &Value,
	) -> Result<(), IdentityProviderError> {
		match AuthErrorEnvelope::from_body(body) {
			Some(envelope) => Err(IdentityProviderError::new(&envelope, response)),
			None => Ok(()),
		}
	}
}

fn parse_endpoint(raw: &'static str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { url: raw, source })
}
