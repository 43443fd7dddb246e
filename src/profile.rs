//! Normalized view over the Spark `my/account` resource-owner payload.
//!
//! Spark wraps every API result as `{"D": {"Results": [ ... ]}}`. [`UserProfile`] unwraps the
//! single account object at `D.Results[0]` and exposes the commonly used fields, while the
//! full object stays reachable through [`UserProfile::get`] and [`UserProfile::as_map`].

// self
use crate::_prelude::*;

/// Errors raised when the account payload lacks the `D.Results[0]` object.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MalformedProfileError {
	/// The `D` envelope is absent or not an object.
	#[error("Resource owner response is missing the `D` object.")]
	MissingData,
	/// `D.Results` is absent or not an array.
	#[error("Resource owner response is missing the `D.Results` array.")]
	MissingResults,
	/// `D.Results` contains no entries.
	#[error("Resource owner response has an empty `D.Results` array.")]
	EmptyResults,
	/// `D.Results[0]` is not an object.
	#[error("Resource owner entry `D.Results[0]` is not an object.")]
	NotAnObject,
}

/// Resource-owner profile unwrapped from `D.Results[0]`.
///
/// Accessors never fail: missing fields read as [`None`] (or `false` for
/// [`is_active`](Self::is_active)).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserProfile {
	fields: Map<String, Value>,
}
impl UserProfile {
	/// Unwraps `D.Results[0]` from a raw account response.
	pub fn from_response(mut response: Map<String, Value>) -> Result<Self, MalformedProfileError> {
		let Some(Value::Object(mut data)) = response.remove("D") else {
			return Err(MalformedProfileError::MissingData);
		};
		let Some(Value::Array(results)) = data.remove("Results") else {
			return Err(MalformedProfileError::MissingResults);
		};

		match results.into_iter().next() {
			Some(Value::Object(fields)) => Ok(Self { fields }),
			Some(_) => Err(MalformedProfileError::NotAnObject),
			None => Err(MalformedProfileError::EmptyResults),
		}
	}

	/// Spark account identifier (`Id`).
	pub fn id(&self) -> Option<&str> {
		self.text("Id")
	}

	/// Display name (`Name`).
	pub fn name(&self) -> Option<&str> {
		self.text("Name")
	}

	/// Brokerage or company name (`Company`).
	pub fn company(&self) -> Option<&str> {
		self.text("Company")
	}

	/// Account status (`Active`); absent or non-boolean values read as inactive.
	pub fn is_active(&self) -> bool {
		self.fields.get("Active").and_then(Value::as_bool).unwrap_or(false)
	}

	/// Address of the first `Emails` entry flagged `Primary`.
	pub fn primary_email(&self) -> Option<&str> {
		self.fields
			.get("Emails")?
			.as_array()?
			.iter()
			.filter_map(Value::as_object)
			.find(|email| email.get("Primary").is_some_and(is_truthy))
			.and_then(|email| email.get("Address"))
			.and_then(Value::as_str)
	}

	/// Looks up any field of the account object.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	/// The unwrapped account object, verbatim.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.fields
	}

	/// Consumes the profile and returns the unwrapped account object.
	pub fn into_map(self) -> Map<String, Value> {
		self.fields
	}

	fn text(&self, key: &str) -> Option<&str> {
		self.fields.get(key).and_then(Value::as_str)
	}
}
impl TryFrom<Map<String, Value>> for UserProfile {
	type Error = MalformedProfileError;

	fn try_from(response: Map<String, Value>) -> Result<Self, Self::Error> {
		Self::from_response(response)
	}
}

// Spark flags are JSON booleans in practice; numbers and strings follow loose truthiness.
fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty() && text != "0",
		Value::Array(items) => !items.is_empty(),
		Value::Object(entries) => !entries.is_empty(),
	}
}
