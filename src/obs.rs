//! Observability for FlexMLS provider calls.
//!
//! Every public call (authorize URL construction, token exchanges, account lookups) reports one
//! attempt and one terminal outcome. A failed call is labeled with the [`ErrorClass`] of the
//! error handed back to the caller, so an identity-provider rejection and a malformed account
//! profile do not collapse into the same bucket.
//!
//! # Feature Flags
//!
//! - `tracing`: calls run inside an `oauth2_flexmls.call` span with the `call` and `stage`
//!   fields, plus `status` (provider HTTP status), `outcome`, and `error` once they are known.
//! - `metrics`: the `oauth2_flexmls_call_total` counter is labeled by `call` and `outcome`;
//!   failures add an `error` label carrying the class.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Provider calls observed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Authorization URL construction.
	Authorization,
	/// Token endpoint exchange.
	TokenExchange,
	/// Resource-owner (account) fetch.
	ResourceOwner,
}
impl CallKind {
	/// Label used for the `call` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Authorization => "authorization",
			CallKind::TokenExchange => "token_exchange",
			CallKind::ResourceOwner => "resource_owner",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Coarse classification of an [`Error`] for span fields and metric labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
	/// Local configuration or request construction problem.
	Config,
	/// Network or IO failure before a response arrived.
	Transport,
	/// Provider answered with an `error` envelope.
	IdentityProvider,
	/// Provider answered with something other than a JSON object.
	InvalidResponseShape,
	/// Account response lacked the `D.Results[0]` record.
	MalformedProfile,
	/// Token endpoint answered with an object that is not a token.
	TokenParse,
	/// Redirect `state` did not match the session.
	StateMismatch,
}
impl ErrorClass {
	/// Label used for the `error` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorClass::Config => "config",
			ErrorClass::Transport => "transport",
			ErrorClass::IdentityProvider => "identity_provider",
			ErrorClass::InvalidResponseShape => "invalid_response_shape",
			ErrorClass::MalformedProfile => "malformed_profile",
			ErrorClass::TokenParse => "token_parse",
			ErrorClass::StateMismatch => "state_mismatch",
		}
	}
}
impl From<&Error> for ErrorClass {
	fn from(err: &Error) -> Self {
		match err {
			Error::Config(_) => ErrorClass::Config,
			Error::Transport(_) => ErrorClass::Transport,
			Error::IdentityProvider(_) => ErrorClass::IdentityProvider,
			Error::MalformedProfile(_) => ErrorClass::MalformedProfile,
			Error::InvalidResponseShape { .. } => ErrorClass::InvalidResponseShape,
			Error::TokenResponseParse { .. } => ErrorClass::TokenParse,
			Error::StateMismatch => ErrorClass::StateMismatch,
		}
	}
}
impl Display for ErrorClass {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Attempt or terminal outcome of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to an adapter operation.
	Attempt,
	/// The caller received a value.
	Success,
	/// The caller received an error of the given class.
	Failure(ErrorClass),
}
impl CallOutcome {
	/// Label used for the `outcome` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure(_) => "failure",
		}
	}

	/// Class of the failure, if this is one.
	pub const fn error_class(self) -> Option<ErrorClass> {
		match self {
			CallOutcome::Failure(class) => Some(class),
			_ => None,
		}
	}

	/// Terminal outcome of `result`.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(err) => CallOutcome::Failure(err.into()),
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.error_class() {
			Some(class) => write!(f, "{}({class})", self.as_str()),
			None => f.write_str(self.as_str()),
		}
	}
}

/// Records the terminal outcome of a call on `span` and in the call counter.
pub fn finish_call<T>(kind: CallKind, span: &CallSpan, result: &Result<T>) -> CallOutcome {
	let outcome = CallOutcome::of(result);

	span.record_outcome(outcome);
	record_call_outcome(kind, outcome);

	outcome
}
