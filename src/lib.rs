//! USPS Prices and Addresses gateway.
//!
//! OAuth-aware clients for the Domestic Prices v3 base-rates search and the Addresses v3
//! standardization endpoint, plus a thin JSON HTTP front (`server` feature) built on top of
//! them.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod addresses;
pub mod auth;
#[cfg(feature = "server")] pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod prices;
#[cfg(feature = "server")] pub mod server;

mod api;

#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by unit and integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		addresses::AddressesClient,
		auth::{StaticTokenProvider, TokenProvider},
		http::ClientConfig,
		prices::PricesClient,
	};

	/// Bearer token handed out by [`static_tokens`].
	pub const TEST_BEARER: &str = "test-token";

	/// Token provider that always yields [`TEST_BEARER`].
	pub fn static_tokens() -> Arc<dyn TokenProvider> {
		Arc::new(StaticTokenProvider::new(TEST_BEARER))
	}

	/// Parses a mock server URL into a client configuration.
	pub fn test_client_config(base_url: &str) -> ClientConfig {
		ClientConfig::new(Url::parse(base_url).expect("Mock server URL should parse."))
	}

	/// Builds a [`PricesClient`] rooted at `base_url` and backed by [`static_tokens`].
	pub fn test_prices_client(base_url: &str) -> PricesClient {
		PricesClient::new(test_client_config(base_url), static_tokens())
			.expect("Prices client should build for tests.")
	}

	/// Builds an [`AddressesClient`] rooted at `base_url` and backed by [`static_tokens`].
	pub fn test_addresses_client(base_url: &str) -> AddressesClient {
		AddressesClient::new(test_client_config(base_url), static_tokens())
			.expect("Addresses client should build for tests.")
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(feature = "server")] use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};
