//! Optional observability helpers for outbound USPS calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `shipping_api.call` with the `call`
//!   (endpoint), `stage` (call site), and `outcome` fields.
//! - Enable `metrics` to increment the `shipping_api_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.
//! - The `server` feature adds [`init_subscriber`] for the service binary.

mod metrics;
#[cfg(feature = "server")] mod subscriber;
mod tracing;

pub use metrics::*;
#[cfg(feature = "server")] pub use subscriber::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outbound USPS calls observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// OAuth token exchange.
	Token,
	/// OAuth token revocation.
	Revoke,
	/// Prices base-rates search.
	BaseRates,
	/// Addresses standardization lookup.
	Address,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Token => "token",
			CallKind::Revoke => "revoke",
			CallKind::BaseRates => "base_rates",
			CallKind::Address => "address",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
