// self
use crate::obs::{CallKind, CallOutcome};

/// Increments `oauth2_flexmls_call_total` for `outcome` (when `metrics` is enabled).
///
/// Failures carry an extra `error` label naming their [`ErrorClass`](crate::obs::ErrorClass).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		let call = kind.as_str();
		let label = outcome.as_str();

		match outcome.error_class() {
			Some(class) => metrics::counter!(
				"oauth2_flexmls_call_total",
				"call" => call,
				"outcome" => label,
				"error" => class.as_str()
			)
			.increment(1),
			None => metrics::counter!(
				"oauth2_flexmls_call_total",
				"call" => call,
				"outcome" => label
			)
			.increment(1),
		}
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
