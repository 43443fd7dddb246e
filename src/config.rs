//! Immutable client configuration supplied once at construction.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Agent string sent when the configuration does not name one.
pub const DEFAULT_USER_AGENT: &str =
	concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client registration details for the FlexMLS / Spark Platform application.
///
/// The configuration is read-only once built; header values, credentials, and redirect
/// handling are derived from it on every call instead of being mutated later.
///
/// The client secret is read when deserializing but never written when serializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for the confidential Spark application.
	#[serde(default, skip_serializing)]
	pub client_secret: Option<TokenSecret>,
	/// Redirect URI registered with the provider.
	#[serde(default)]
	pub redirect_uri: Option<Url>,
	/// Value sent in the `User-Agent` and `X-SparkApi-User-Agent` headers.
	#[serde(default)]
	pub user_agent: Option<String>,
	/// Adds an S256 PKCE challenge to authorization requests when enabled.
	#[serde(default)]
	pub pkce: bool,
}
impl ClientConfig {
	/// Creates a new builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(client_id)
	}

	/// Configured agent string or [`DEFAULT_USER_AGENT`].
	pub fn user_agent(&self) -> &str {
		self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
	}

	/// Client credentials used for token endpoint authentication.
	pub fn credentials(&self) -> ClientCredentials {
		ClientCredentials {
			client_id: self.client_id.clone(),
			client_secret: self.client_secret.clone(),
		}
	}

	/// Validates invariants for configurations loaded through serde.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}

		Ok(())
	}
}

/// Client ID and secret pair handed to token request customizers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret, if the client is confidential.
	pub client_secret: Option<TokenSecret>,
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	config: ClientConfig,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided client identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			config: ClientConfig {
				client_id: client_id.into(),
				client_secret: None,
				redirect_uri: None,
				user_agent: None,
				pkce: false,
			},
		}
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.config.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the redirect URI registered with the provider.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.config.redirect_uri = Some(url);

		self
	}

	/// Sets the agent string sent with every request.
	pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
		self.config.user_agent = Some(agent.into());

		self
	}

	/// Toggles PKCE for authorization requests.
	pub fn pkce(mut self, enabled: bool) -> Self {
		self.config.pkce = enabled;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}
