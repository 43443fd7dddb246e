#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use oauth2_flexmls::{auth::ScopeSet, error::Error, http::ReqwestHttpClient};

const TOKEN_BODY: &str = "{\"access_token\":\"access-1\",\"refresh_token\":\"refresh-1\",\"id_token\":\"h.p.s\",\"token_type\":\"Bearer\",\"expires_in\":86400}";

#[tokio::test]
async fn exchange_code_authenticates_with_basic_credentials() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/openid/token")
				.header("authorization", expected_basic_header())
				.header("user-agent", TEST_USER_AGENT)
				.header("x-sparkapi-user-agent", TEST_USER_AGENT)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let token = client
		.exchange_code("code-123", None)
		.await
		.expect("Authorization code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(token.access_token.expose(), "access-1");
	assert_eq!(token.refresh_token.as_ref().map(|secret| secret.expose()), Some("refresh-1"));
	assert_eq!(token.id_token.as_ref().map(|secret| secret.expose()), Some("h.p.s"));
	assert!(token.expires_at.is_some_and(|expires_at| expires_at > token.issued_at));
}

#[tokio::test]
async fn reserved_characters_in_the_secret_survive_basic_auth() {
	let server = MockServer::start_async().await;
	let client = build_test_client_with_config(
		&server.base_url(),
		test_client_config_with_secret("s3cr:t/@"),
		ReqwestHttpClient::default(),
	);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/openid/token")
				.header("authorization", basic_header(TEST_CLIENT_ID, "s3cr:t/@"));
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let token = client
		.exchange_code("code-123", None)
		.await
		.expect("Exchange with a reserved-character secret should succeed.");

	mock.assert_async().await;

	assert_eq!(basic_header(TEST_CLIENT_ID, "s3cr:t/@"), "Basic Y2xpZW50LWl0OnMzY3I6dC9A");
	assert_eq!(token.access_token.expose(), "access-1");
}

#[tokio::test]
async fn complete_authorization_exchanges_after_state_check() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let session = client
		.start_authorization(&ScopeSet::default())
		.expect("Authorization session should start.");

	assert!(session.authorize_url.as_str().starts_with(&server.url("/openid/authorize")));

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/openid/token")
				.header("authorization", expected_basic_header());
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let err = client
		.complete_authorization(&session, "forged-state", "code-123")
		.await
		.expect_err("Mismatched state must be rejected before any exchange.");

	assert!(matches!(err, Error::StateMismatch));

	let token = client
		.complete_authorization(&session, &session.state, "code-123")
		.await
		.expect("Exchange should succeed once state validates.");

	mock.assert_async().await;

	assert_eq!(token.access_token.expose(), "access-1");
}

#[tokio::test]
async fn exchange_refresh_token_is_a_single_call() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/openid/token")
				.header("authorization", expected_basic_header())
				.header("x-sparkapi-user-agent", TEST_USER_AGENT);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"access-2\",\"expires_in\":3600}");
		})
		.await;
	let token = client
		.exchange_refresh_token("refresh-1")
		.await
		.expect("Refresh exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(token.access_token.expose(), "access-2");
	assert!(token.refresh_token.is_none());
}

#[tokio::test]
async fn provider_error_envelope_is_surfaced() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"bad code\"}");
		})
		.await;
	let err = client
		.exchange_code("stale-code", None)
		.await
		.expect_err("Error envelopes must fail the exchange.");

	mock.assert_async().await;

	let provider_err = match err {
		Error::IdentityProvider(provider_err) => provider_err,
		other => panic!("Expected an identity provider error, got {other:?}."),
	};

	assert_eq!(provider_err.status, 400);
	assert_eq!(provider_err.to_string(), "400 - bad code: invalid_grant");
	assert!(provider_err.response.text().contains("invalid_grant"));
}

#[tokio::test]
async fn provider_error_links_documentation() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/token");
			then.status(400).header("content-type", "application/json").body(
				"{\"error\":\"invalid_grant\",\"error_description\":\"bad code\",\"error_uri\":\"https://x/doc\"}",
			);
		})
		.await;

	let err = client
		.exchange_code("stale-code", None)
		.await
		.expect_err("Error envelopes must fail the exchange.");

	assert!(err.to_string().ends_with(" (see: https://x/doc)"));
}

#[tokio::test]
async fn non_json_token_body_is_an_invalid_shape() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/token");
			then.status(502).header("content-type", "text/html").body("<html>Bad gateway</html>");
		})
		.await;

	let err = client
		.exchange_code("code-123", None)
		.await
		.expect_err("HTML bodies must be rejected.");

	assert!(matches!(err, Error::InvalidResponseShape { endpoint: "token endpoint", status: 502 }));
}

#[tokio::test]
async fn object_without_access_token_fails_to_parse() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"Bearer\"}");
		})
		.await;

	let err = client
		.exchange_code("code-123", None)
		.await
		.expect_err("Token bodies without access_token must be rejected.");

	assert!(matches!(err, Error::TokenResponseParse { status: 200, .. }));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
	let client = build_reqwest_test_client("http://127.0.0.1:9");
	let err = client
		.exchange_code("code-123", None)
		.await
		.expect_err("Connection failures must surface.");

	assert!(matches!(err, Error::Transport(_)));
}
