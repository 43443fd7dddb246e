//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};
use url::Url;
// self
use oauth2_flexmls::{
	auth::Token,
	config::ClientConfig,
	flows::ProviderClient,
	http::{ProviderHttpClient, ReqwestHttpClient},
	provider::{FlexMlsPolicy, ProviderEndpoints, ProviderPolicy},
};

/// Client ID shared by the integration test fixtures.
pub const TEST_CLIENT_ID: &str = "client-it";
/// Client secret shared by the integration test fixtures.
pub const TEST_CLIENT_SECRET: &str = "secret-it";
/// User agent shared by the integration test fixtures.
pub const TEST_USER_AGENT: &str = "flexmls-it/1.0";
/// Redirect URI shared by the integration test fixtures.
pub const TEST_REDIRECT_URI: &str = "https://app.example.com/callback";

/// Client type used by reqwest-backed integration tests.
pub type ReqwestTestClient = ProviderClient<ReqwestHttpClient>;

/// Builds the configuration used across integration tests.
pub fn test_client_config() -> ClientConfig {
	test_client_config_with_secret(TEST_CLIENT_SECRET)
}

/// Builds the fixture configuration with a different client secret.
pub fn test_client_config_with_secret(secret: &str) -> ClientConfig {
	ClientConfig::builder(TEST_CLIENT_ID)
		.client_secret(secret)
		.redirect_uri(Url::parse(TEST_REDIRECT_URI).expect("Redirect URI fixture should parse."))
		.user_agent(TEST_USER_AGENT)
		.build()
		.expect("Client configuration fixture should build.")
}

/// Points every FlexMLS endpoint at the mock server rooted at `base`.
pub fn mock_endpoints(base: &str) -> ProviderEndpoints {
	let join =
		|path: &str| Url::parse(&format!("{base}{path}")).expect("Mock provider URL should parse.");

	ProviderEndpoints {
		authorization: join("/openid/authorize"),
		token: join("/openid/token"),
		resource_owner: join("/v1/my/account"),
	}
}

/// Builds a client with any transport whose FlexMLS policy targets the mock server at `base`.
pub fn build_test_client<C>(base: &str, http_client: C) -> ProviderClient<C>
where
	C: ProviderHttpClient,
{
	build_test_client_with_config(base, test_client_config(), http_client)
}

/// Same as [`build_test_client`] with a caller-supplied configuration.
pub fn build_test_client_with_config<C>(
	base: &str,
	config: ClientConfig,
	http_client: C,
) -> ProviderClient<C>
where
	C: ProviderHttpClient,
{
	let policy: Arc<dyn ProviderPolicy> =
		Arc::new(FlexMlsPolicy::from_config(&config).with_endpoints(mock_endpoints(base)));

	ProviderClient::with_http_client(config, policy, http_client)
}

/// Builds a reqwest-backed client targeting the mock server at `base`.
pub fn build_reqwest_test_client(base: &str) -> ReqwestTestClient {
	build_test_client(base, ReqwestHttpClient::default())
}

/// Expected `Authorization` header for the fixture credentials.
pub fn expected_basic_header() -> String {
	basic_header(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
}

/// `Authorization: Basic` value for the raw (unencoded) `client_id:secret` pair.
pub fn basic_header(client_id: &str, secret: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{client_id}:{secret}")))
}

/// Builds a token holding `access_token`.
pub fn bearer_token(access_token: &str) -> Token {
	let mut body = Map::new();

	body.insert("access_token".into(), Value::String(access_token.into()));
	body.insert("token_type".into(), Value::String("Bearer".into()));

	Token::from_response(body, time::OffsetDateTime::now_utc())
		.expect("Token fixture should parse.")
}

/// Sample account response mirroring the Spark `my/account` payload.
pub fn sample_account_body() -> Value {
	serde_json::json!({
		"D": {
			"Success": true,
			"Results": [{
				"Id": "42",
				"Name": "Jane",
				"Company": "Demo Realty",
				"Active": true,
				"Emails": [
					{"Type": "Work", "Name": "Work", "Address": "a@x.com", "Primary": false},
					{"Type": "Home", "Name": "Home", "Address": "b@x.com", "Primary": true}
				],
				"Phones": [{"Type": "Office", "Number": "701-555-1212", "Primary": true}]
			}]
		}
	})
}
