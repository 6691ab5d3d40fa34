//! USPS Domestic Prices v3 client.
//!
//! [`PricesClient::search_base_rates`] performs exactly one token acquisition followed by one
//! `POST {base}/base-rates/search`. The response body is read in full; its typed view is
//! decoded on a best-effort basis while the raw bytes are always returned.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

// crates.io
use reqwest::{Method, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	api::ApiCore,
	auth::TokenProvider,
	error::SerializationError,
	http::{APPLICATION_JSON, ClientConfig},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Production Prices API root.
pub const PRICES_PRODUCTION_BASE_URL: &str = "https://apis.usps.com/prices/v3";
/// Customer testing environment Prices API root.
pub const PRICES_TESTING_BASE_URL: &str = "https://apis-tem.usps.com/prices/v3";

/// Bearer-authenticated client for the Prices API.
///
/// Cloning is cheap; clones share the transport and token provider. A default-constructed
/// client is inert and answers every call with [`Error::NotInitialized`].
#[derive(Clone, Debug, Default)]
pub struct PricesClient {
	inner: Option<Arc<ApiCore>>,
}
impl PricesClient {
	/// Builds a client rooted at `config.base_url`.
	pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
		Ok(Self { inner: Some(Arc::new(ApiCore::new(config, tokens)?)) })
	}

	/// Builds a client for the production environment.
	pub fn production(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
		Self::new(ClientConfig::parse(PRICES_PRODUCTION_BASE_URL)?, tokens)
	}

	/// Builds a client for the customer testing environment.
	pub fn testing(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
		Self::new(ClientConfig::parse(PRICES_TESTING_BASE_URL)?, tokens)
	}

	/// Searches domestic base rates.
	///
	/// Fails with [`Error::Auth`] before any rate request is sent when no token can be
	/// acquired. Non-2xx answers become [`Error::Remote`] carrying the upstream status.
	pub async fn search_base_rates(
		&self,
		request: &DomesticBaseRatesRequest,
	) -> Result<DomesticBaseRatesResponse> {
		const KIND: CallKind = CallKind::BaseRates;

		let span = CallSpan::new(KIND, "search_base_rates");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let core = self.inner.as_deref().ok_or(Error::NotInitialized)?;
				let url = core.endpoint(&["base-rates", "search"])?;
				let builder = core.authorized(Method::POST, url).await?;
				let body = serde_json::to_vec(request).map_err(SerializationError::encode)?;
				let response = core
					.dispatch(builder.header(CONTENT_TYPE, APPLICATION_JSON).body(body))
					.await?;

				Ok(DomesticBaseRatesResponse::from_raw(response.body))
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
