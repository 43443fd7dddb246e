//! Token value returned by a successful exchange.

// crates.io
use serde::{
	Deserializer,
	de::{self, Unexpected},
};
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Access token issued by the provider.
///
/// The adapter never stores tokens; the caller owns the value after an exchange.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
	/// Bearer credential used for API calls; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// OpenID Connect ID token, if the provider issued one.
	pub id_token: Option<TokenSecret>,
	/// Token type reported by the provider (usually `Bearer`).
	pub token_type: Option<String>,
	/// Instant the exchange completed.
	pub issued_at: OffsetDateTime,
	/// Expiry derived from `issued_at + expires_in`, when the provider reported a lifetime.
	pub expires_at: Option<OffsetDateTime>,
	/// Fields the provider returned beyond the standard set.
	pub extra: Map<String, Value>,
}
impl Token {
	/// Builds a token from a token endpoint body, anchoring relative expiry at `issued_at`.
	pub fn from_response(
		body: Map<String, Value>,
		issued_at: OffsetDateTime,
	) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let response: TokenResponseBody = serde_path_to_error::deserialize(Value::Object(body))?;
		let expires_at = response
			.expires_in
			.filter(|secs| *secs > 0)
			.and_then(|secs| issued_at.checked_add(Duration::seconds(secs)));

		Ok(Self {
			access_token: TokenSecret::new(response.access_token),
			refresh_token: response.refresh_token.map(TokenSecret::new),
			id_token: response.id_token.map(TokenSecret::new),
			token_type: response.token_type,
			issued_at,
			expires_at,
			extra: response.extra,
		})
	}

	/// Returns `true` if the token carries an expiry at or before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenResponseBody {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	id_token: Option<String>,
	#[serde(default)]
	token_type: Option<String>,
	#[serde(default, deserialize_with = "lifetime_seconds")]
	expires_in: Option<i64>,
	#[serde(flatten)]
	extra: Map<String, Value>,
}

/// Accepts `expires_in` as a JSON number or a numeric string; a blank string means no lifetime.
fn lifetime_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Lifetime {
		Seconds(i64),
		Text(String),
	}

	match Option::<Lifetime>::deserialize(deserializer)? {
		None => Ok(None),
		Some(Lifetime::Seconds(secs)) => Ok(Some(secs)),
		Some(Lifetime::Text(text)) if text.trim().is_empty() => Ok(None),
		Some(Lifetime::Text(text)) => text
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| {
				<D::Error as de::Error>::invalid_value(Unexpected::Str(&text), &"a number of seconds")
			}),
	}
}
