//! Adapter-level error types shared across flows, the provider policy, and profiles.

// self
use crate::{_prelude::*, http::ProviderResponse, profile::MalformedProfileError};

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with an explicit `error` envelope.
	#[error(transparent)]
	IdentityProvider(#[from] IdentityProviderError),
	/// Resource-owner profile lacks the `D.Results[0]` object.
	#[error(transparent)]
	MalformedProfile(#[from] MalformedProfileError),

	/// Response body was not a JSON object.
	#[error("Invalid response received from {endpoint} (HTTP {status}). Expected JSON.")]
	InvalidResponseShape {
		/// Endpoint label (`token endpoint` or `resource owner endpoint`).
		endpoint: &'static str,
		/// HTTP status code of the offending response.
		status: u16,
	},
	/// Token endpoint responded with a JSON object that is not a token response.
	#[error("Token endpoint returned a malformed token response.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the offending response.
		status: u16,
	},
	/// Redirect handler received a `state` that does not belong to the session.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}

/// Configuration and validation failures raised by the adapter.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Client ID must not be empty.
	#[error("Client ID cannot be empty.")]
	MissingClientId,
	/// Token exchanges need a redirect URI registered with the provider.
	#[error("Redirect URI is required for authorization code flows.")]
	MissingRedirectUri,
	/// Endpoint cannot carry client credentials in its user-info component.
	#[error("Endpoint `{url}` cannot carry client credentials.")]
	CredentialPlacement {
		/// Endpoint that rejected the user-info component.
		url: String,
	},
	/// Built-in endpoint constant is not an absolute URL.
	#[error("Endpoint `{url}` is not a valid URL.")]
	InvalidEndpoint {
		/// Endpoint text that failed to parse.
		url: &'static str,
		/// Parser failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure it could not classify.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Provider rejected a request with an explicit `error` field.
///
/// The message follows the provider's documented layout,
/// `"{status} - {error_description}: {error}"`, with ` (see: {error_uri})` appended when the
/// provider links to documentation. The full response stays available for inspection.
#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct IdentityProviderError {
	/// HTTP status code returned alongside the envelope.
	pub status: u16,
	/// Human-readable message assembled from the envelope.
	pub message: String,
	/// Copy of the offending response.
	pub response: ProviderResponse,
}
impl IdentityProviderError {
	/// Builds the error from a parsed envelope and the response that carried it.
	pub fn new(envelope: &AuthErrorEnvelope, response: &ProviderResponse) -> Self {
		let status = response.status.as_u16();

		Self { status, message: envelope.message(status), response: response.clone() }
	}
}

/// Provider error envelope: `{"error", "error_description", "error_uri"?}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthErrorEnvelope {
	/// Provider error code.
	pub error: String,
	/// Human-readable description.
	pub error_description: Option<String>,
	/// Link to provider documentation for the error.
	pub error_uri: Option<String>,
}
impl AuthErrorEnvelope {
	/// Extracts the envelope when `body` is an object with a non-null `error` key.
	pub fn from_body(body: &Value) -> Option<Self> {
		let object = body.as_object()?;
		let error = object.get("error").and_then(text_of)?;

		Some(Self {
			error,
			error_description: object.get("error_description").and_then(text_of),
			error_uri: object.get("error_uri").and_then(text_of),
		})
	}

	/// Formats the envelope for the given HTTP status.
	pub fn message(&self, status: u16) -> String {
		let description = self.error_description.as_deref().unwrap_or_default();
		let mut message = format!("{status} - {description}: {}", self.error);

		if let Some(uri) = self.error_uri.as_deref().filter(|uri| !uri.is_empty()) {
			message.push_str(&format!(" (see: {uri})"));
		}

		message
	}
}

fn text_of(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(text) => Some(text.clone()),
		other => Some(other.to_string()),
	}
}
