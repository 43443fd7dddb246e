//! Bearer-authorized requests and the resource-owner (account) fetch.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::Token,
	error::ConfigError,
	flows::{ProviderClient, common},
	http::ProviderHttpClient,
	obs::{CallKind, CallSpan},
	profile::UserProfile,
};

impl<C> ProviderClient<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Builds a bearer-authorized request carrying the policy's default headers.
	pub fn authenticated_request(
		&self,
		method: Method,
		url: &Url,
		token: &Token,
	) -> Result<HttpRequest> {
		let mut builder = Request::builder()
			.method(method)
			.uri(url.as_str())
			.header(AUTHORIZATION, format!("Bearer {}", token.access_token.expose()))
			.header(ACCEPT, "application/json");

		for (name, value) in self.policy.default_headers() {
			builder = builder.header(name, value);
		}

		builder.body(Vec::new()).map_err(|e| ConfigError::from(e).into())
	}

	/// Fetches the raw account response for `token`.
	///
	/// The body is returned unmodified once the provider's error check passes; anything other
	/// than a JSON object fails with [`Error::InvalidResponseShape`].
	pub async fn fetch_resource_owner_details(&self, token: &Token) -> Result<Map<String, Value>> {
		common::observed(CallKind::ResourceOwner, "fetch_resource_owner_details", |span| {
			self.request_details(token, span)
		})
		.await
	}

	/// Fetches and normalizes the resource-owner profile for `token`.
	///
	/// Normalization runs inside the same observed call, so a response without a
	/// `D.Results[0]` record is reported as a `malformed_profile` failure.
	pub async fn resource_owner(&self, token: &Token) -> Result<UserProfile> {
		common::observed(CallKind::ResourceOwner, "resource_owner", |span| async move {
			let details = self.request_details(token, span).await?;

			Ok(UserProfile::from_response(details)?)
		})
		.await
	}

	async fn request_details(&self, token: &Token, span: CallSpan) -> Result<Map<String, Value>> {
		let url = self.policy.resource_owner_details_url(token)?;
		let request = self.authenticated_request(Method::GET, &url, token)?;
		let response = common::dispatch(self.http_client.as_ref(), request).await?;

		span.record_status(response.status.as_u16());

		common::checked_body(
			self.policy.as_ref(),
			&response,
			common::RESOURCE_OWNER_ENDPOINT_LABEL,
		)
	}
}
