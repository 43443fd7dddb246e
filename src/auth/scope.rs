//! Scopes requested in the authorize URL.

// std
use std::collections::BTreeSet;
// self
use crate::_prelude::*;

const OPENID: &str = "openid";

/// Reasons a scope cannot be placed in the `scope` parameter.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// The `scope` parameter is delimiter-separated, so a scope cannot contain whitespace.
	#[error("Scope `{scope}` contains whitespace.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Sorted, deduplicated scopes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet(BTreeSet<String>);
impl ScopeSet {
	/// Validates and collects `scopes`.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		scopes.into_iter().map(|scope| validate(scope.into())).collect::<Result<_, _>>().map(Self)
	}

	/// The OpenID Connect `openid` scope on its own.
	pub fn openid() -> Self {
		Self(BTreeSet::from([OPENID.to_owned()]))
	}

	/// Returns true if no scopes are requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Scopes in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Scopes present in either set.
	pub fn union(&self, other: &ScopeSet) -> ScopeSet {
		Self(self.0.union(&other.0).cloned().collect())
	}

	/// Value of the `scope` parameter, or [`None`] when the parameter should be omitted.
	pub fn join(&self, delimiter: char) -> Option<String> {
		if self.is_empty() {
			return None;
		}

		Some(self.iter().collect::<Vec<_>>().join(delimiter.to_string().as_str()))
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_set().entries(self.iter()).finish()
	}
}

fn validate(scope: String) -> Result<String, ScopeValidationError> {
	if scope.is_empty() {
		Err(ScopeValidationError::Empty)
	} else if scope.contains(char::is_whitespace) {
		Err(ScopeValidationError::ContainsWhitespace { scope })
	} else {
		Ok(scope)
	}
}
