// self
use crate::{
	_prelude::*,
	obs::{CallKind, CallOutcome},
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"shipping_api_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records success or failure for a finished call.
pub fn record_result<T>(kind: CallKind, result: &Result<T>) {
	match result {
		Ok(_) => record_call_outcome(kind, CallOutcome::Success),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(call = kind.as_str(), error = %_e, "USPS call failed.");

			record_call_outcome(kind, CallOutcome::Failure);
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_call_outcome_noop_without_metrics() {
		record_call_outcome(CallKind::BaseRates, CallOutcome::Failure);
		record_result::<()>(CallKind::Address, &Err(Error::NotInitialized));
	}
}
