//! JSON HTTP front over the Prices and Addresses clients.
//!
//! Handlers decode the inbound body or query string, call exactly one client, and write a
//! JSON envelope. Failures short-circuit into [`ApiError`], which picks the HTTP status from
//! the error kind.

pub mod error;
pub mod handlers;

pub use error::*;

// crates.io
use axum::{
	Router,
	routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
// self
use crate::{addresses::AddressesClient, prices::PricesClient};

/// Clients shared by every handler.
#[derive(Clone, Debug, Default)]
pub struct AppState {
	/// Prices API client.
	pub prices: PricesClient,
	/// Addresses API client.
	pub addresses: AddressesClient,
}

/// Builds the router with all routes mounted.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/healthz", get(handlers::healthz))
		.route(
			"/v1/addresses/standardize",
			get(handlers::standardize_query).post(handlers::standardize_json),
		)
		.route("/v1/rates/search", post(handlers::search_rates))
		.route("/v1/rates/example", get(handlers::example_rates))
		.with_state(state)
}

/// Serves the router on `listener` until `shutdown` fires.
pub async fn serve(
	listener: TcpListener,
	state: AppState,
	shutdown: CancellationToken,
) -> std::io::Result<()> {
	axum::serve(listener, router(state))
		.with_graceful_shutdown(async move { shutdown.cancelled().await })
		.await
}
