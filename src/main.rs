//! `shipping-api` service binary.

// crates.io
use color_eyre::Result;
use tokio::net::TcpListener;
// self
use shipping_api::{
	CancellationToken,
	config::ServiceConfig,
	obs,
	server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ServiceConfig::load()?;

	obs::init_subscriber(config.log_json);

	let tokens = config.token_provider()?;
	let state = AppState {
		prices: config.prices_client(tokens.clone())?,
		addresses: config.addresses_client(tokens)?,
	};
	let listener = TcpListener::bind(config.listen).await?;
	let shutdown = CancellationToken::new();

	tokio::spawn({
		let shutdown = shutdown.clone();

		async move {
			match tokio::signal::ctrl_c().await {
				Ok(()) => {
					tracing::info!("Shutdown requested.");
					shutdown.cancel();
				},
				Err(e) => tracing::warn!(error = %e, "Ctrl-C handler unavailable."),
			}
		}
	});
	tracing::info!(
		listen = %config.listen,
		environment = ?config.environment,
		"Serving the USPS gateway."
	);

	server::serve(listener, state, shutdown).await?;

	Ok(())
}
