#![cfg(feature = "reqwest")]

mod common;

// std
use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex},
};
// self
use common::*;
use oauth2_flexmls::{
	http::ProviderHttpClient,
	oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{HeaderMap, Method, StatusCode, Uri},
	},
};

#[derive(Clone, Debug)]
struct RecordedRequest {
	method: Method,
	uri: Uri,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl From<HttpRequest> for RecordedRequest {
	fn from(request: HttpRequest) -> Self {
		let (parts, body) = request.into_parts();

		Self { method: parts.method, uri: parts.uri, headers: parts.headers, body }
	}
}

#[derive(Clone)]
struct RecordingHttpClient {
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
	status: StatusCode,
	body: &'static str,
}
impl RecordingHttpClient {
	fn replying(status: StatusCode, body: &'static str) -> Self {
		Self { requests: Default::default(), status, body }
	}

	fn recorded(&self) -> Vec<RecordedRequest> {
		self.requests.lock().expect("Recorder lock should not be poisoned.").clone()
	}
}
impl<'c> AsyncHttpClient<'c> for RecordingHttpClient {
	type Error = HttpClientError<std::io::Error>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		self.requests.lock().expect("Recorder lock should not be poisoned.").push(request.into());

		let mut response = HttpResponse::new(self.body.as_bytes().to_vec());

		*response.status_mut() = self.status;

		Box::pin(async move { Ok(response) })
	}
}
impl ProviderHttpClient for RecordingHttpClient {
	type Handle = RecordingHttpClient;
	type TransportError = std::io::Error;

	fn handle(&self) -> Self::Handle {
		self.clone()
	}
}

fn body_pairs(request: &RecordedRequest) -> Vec<(String, String)> {
	url::form_urlencoded::parse(&request.body).into_owned().collect()
}

#[tokio::test]
async fn token_request_moves_credentials_out_of_the_body() {
	let transport = RecordingHttpClient::replying(StatusCode::OK, "{\"access_token\":\"a\"}");
	let client = build_test_client("https://spark.test", transport.clone());

	client.exchange_code("code-1", Some("verifier-1")).await.expect("Exchange should succeed.");

	let recorded = transport.recorded();

	assert_eq!(recorded.len(), 1);

	let request = &recorded[0];
	let pairs = body_pairs(request);
	let authority = request.uri.authority().map(|authority| authority.as_str().to_owned());

	assert_eq!(request.method, Method::POST);
	assert_eq!(authority.as_deref(), Some("client-it:secret-it@spark.test"));
	assert_eq!(request.uri.path(), "/openid/token");
	assert!(pairs.iter().all(|(key, _)| key != "client_secret" && key != "client_id"));
	assert!(pairs.contains(&("grant_type".into(), "authorization_code".into())));
	assert!(pairs.contains(&("code".into(), "code-1".into())));
	assert!(pairs.contains(&("code_verifier".into(), "verifier-1".into())));
	assert!(pairs.contains(&("redirect_uri".into(), TEST_REDIRECT_URI.into())));
	assert_eq!(request.headers["user-agent"], TEST_USER_AGENT);
	assert_eq!(request.headers["x-sparkapi-user-agent"], TEST_USER_AGENT);
	assert_eq!(request.headers["content-type"], "application/x-www-form-urlencoded");
}

#[tokio::test]
async fn account_request_never_carries_client_credentials() {
	let transport = RecordingHttpClient::replying(
		StatusCode::OK,
		"{\"D\":{\"Success\":true,\"Results\":[{\"Id\":\"42\"}]}}",
	);
	let client = build_test_client("https://spark.test", transport.clone());
	let profile =
		client.resource_owner(&bearer_token("access-1")).await.expect("Profile should load.");

	assert_eq!(profile.id(), Some("42"));

	let recorded = transport.recorded();
	let request = &recorded[0];

	assert_eq!(request.method, Method::GET);
	assert_eq!(request.uri.to_string(), "https://spark.test/v1/my/account");
	assert_eq!(request.headers["authorization"], "Bearer access-1");
	assert!(request.body.is_empty());
}
