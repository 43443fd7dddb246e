//! Shared helpers for flow implementations (call observation, dispatch, transport error
//! mapping, body checks).

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::{ProviderHttpClient, ProviderResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
	provider::ProviderPolicy,
};

/// Endpoint label used in token endpoint errors.
pub(crate) const TOKEN_ENDPOINT_LABEL: &str = "token endpoint";
/// Endpoint label used in resource-owner endpoint errors.
pub(crate) const RESOURCE_OWNER_ENDPOINT_LABEL: &str = "resource owner endpoint";

/// Runs `call` inside a span for `kind`, recording one attempt and the terminal outcome.
///
/// The outcome reflects exactly what the caller receives, including failures raised after the
/// provider answered.
pub(crate) async fn observed<T, F, Fut>(kind: CallKind, stage: &'static str, call: F) -> Result<T>
where
	F: FnOnce(CallSpan) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(kind, stage);

	obs::record_call_outcome(kind, CallOutcome::Attempt);

	let result = span.instrument(call(span.clone())).await;

	obs::finish_call(kind, &span, &result);

	result
}

/// Sends `request` through a fresh transport handle and copies the reply.
pub(crate) async fn dispatch<C>(http_client: &C, request: HttpRequest) -> Result<ProviderResponse>
where
	C: ?Sized + ProviderHttpClient,
{
	let handle = http_client.handle();
	let response = handle.call(request).await.map_err(map_transport_error)?;

	Ok(response.into())
}

/// Normalizes transport failures into adapter errors.
pub(crate) fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unclassified transport failure".into() }.into(),
	}
}

/// Parses a response, runs the policy's error check, and requires a JSON object.
///
/// The provider check runs first so error envelopes win over shape failures.
pub(crate) fn checked_body(
	policy: &dyn ProviderPolicy,
	response: &ProviderResponse,
	endpoint: &'static str,
) -> Result<Map<String, Value>> {
	let body = response.parsed_body();

	policy.check_response(response, &body)?;

	match body {
		Value::Object(map) => Ok(map),
		_ => Err(Error::InvalidResponseShape { endpoint, status: response.status.as_u16() }),
	}
}
