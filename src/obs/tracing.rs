// self
use crate::{_prelude::*, obs::CallKind};

/// `shipping_api.call` span around one outbound USPS call.
///
/// Carries `call` and `stage` from the start and gains `outcome` once the call settles. Without
/// the `tracing` feature the span is a zero-sized no-op.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens the span for `kind` at call site `stage`.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		let span = tracing::info_span!(
			"shipping_api.call",
			call = kind.as_str(),
			stage,
			outcome = tracing::field::Empty,
		);
		#[cfg(not(feature = "tracing"))]
		let _ = (kind, stage);

		Self {
			#[cfg(feature = "tracing")]
			span,
		}
	}

	/// Drives `call` inside the span and tags the span with its outcome.
	pub async fn instrument<T, Fut>(&self, call: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			use crate::obs::CallOutcome;

			let result = call.instrument(self.span.clone()).await;
			let outcome = if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure };

			self.span.record("outcome", outcome.as_str());

			result
		}
		#[cfg(not(feature = "tracing"))]
		{
			call.await
		}
	}
}
