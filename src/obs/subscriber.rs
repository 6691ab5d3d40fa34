// crates.io
use tracing_subscriber::EnvFilter;

/// Installs the process-wide `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Subsequent calls are no-ops.
pub fn init_subscriber(json: bool) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

	let _ = if json { builder.json().try_init() } else { builder.try_init() };
}
