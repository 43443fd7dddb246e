//! Provider client engine driving the authorization, token exchange, and account calls.

pub mod authorization;

mod common;
mod resource_owner;
mod token_exchange;

pub use authorization::*;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	http::ProviderHttpClient,
	provider::ProviderPolicy,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, provider::FlexMlsPolicy};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestProviderClient = ProviderClient<ReqwestHttpClient>;

/// Runs OAuth 2.0 / OpenID Connect calls against a single provider policy.
///
/// The client owns the immutable configuration, the policy that shapes each request, and
/// the shared HTTP transport. It never stores tokens: every exchange hands the resulting
/// [`Token`](crate::auth::Token) back to the caller.
pub struct ProviderClient<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Client registration details.
	pub config: ClientConfig,
	/// Policy supplying endpoints, headers, and response checks.
	pub policy: Arc<dyn ProviderPolicy>,
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
}
impl<C> ProviderClient<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a client that reuses the caller-provided policy and transport.
	pub fn with_http_client(
		config: ClientConfig,
		policy: Arc<dyn ProviderPolicy>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { config, policy, http_client: http_client.into() }
	}
}
#[cfg(feature = "reqwest")]
impl ProviderClient<ReqwestHttpClient> {
	/// Creates a FlexMLS client backed by its own reqwest transport.
	///
	/// The agent headers are taken from [`ClientConfig::user_agent`].
	pub fn new(config: ClientConfig) -> Self {
		let policy = Arc::new(FlexMlsPolicy::from_config(&config));

		Self::with_http_client(config, policy, ReqwestHttpClient::default())
	}
}
impl<C> Clone for ProviderClient<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			policy: self.policy.clone(),
			http_client: self.http_client.clone(),
		}
	}
}
impl<C> Debug for ProviderClient<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderClient")
			.field("client_id", &self.config.client_id)
			.field("client_secret_set", &self.config.client_secret.is_some())
			.field("redirect_uri", &self.config.redirect_uri)
			.field("default_headers", &self.policy.default_headers())
			.finish()
	}
}
