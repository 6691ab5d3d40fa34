//! USPS Addresses v3 client: standardizes a structured domestic address.
//!
//! Validation and normalization happen upstream; this client only forwards the request as
//! query parameters and relays the decoded answer.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	api::ApiCore,
	auth::TokenProvider,
	http::{ClientConfig, decode_json, null_as_default},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Production Addresses API root.
pub const ADDRESSES_PRODUCTION_BASE_URL: &str = "https://apis.usps.com/addresses/v3";
/// Customer testing environment Addresses API root.
pub const ADDRESSES_TESTING_BASE_URL: &str = "https://apis-tem.usps.com/addresses/v3";

/// Address to standardize. Absent fields are omitted from the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
	/// Firm or business name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub firm: Option<String>,
	/// Primary street address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub street_address: Option<String>,
	/// Apartment, suite, or other secondary unit.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secondary_address: Option<String>,
	/// City name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	/// Two-letter state code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// Puerto Rico urbanization.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub urbanization: Option<String>,
	/// 5-digit ZIP code.
	#[serde(rename = "ZIPCode", default, skip_serializing_if = "Option::is_none")]
	pub zip_code: Option<String>,
	/// 4-digit ZIP+4 extension.
	#[serde(rename = "ZIPPlus4", default, skip_serializing_if = "Option::is_none")]
	pub zip_plus4: Option<String>,
}

/// Standardized address returned by USPS.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressResponse {
	/// Firm or business name.
	#[serde(deserialize_with = "null_as_default")]
	pub firm: String,
	/// Normalized address.
	#[serde(deserialize_with = "null_as_default")]
	pub address: Address,
	/// Delivery point details.
	#[serde(deserialize_with = "null_as_default")]
	pub additional_info: AdditionalInfo,
	/// Corrections suggested by USPS.
	#[serde(deserialize_with = "null_as_default")]
	pub corrections: Vec<AddressCode>,
	/// Match indicators.
	#[serde(deserialize_with = "null_as_default")]
	pub matches: Vec<AddressCode>,
	/// Free-text warnings.
	#[serde(deserialize_with = "null_as_default")]
	pub warnings: Vec<String>,
}

/// Normalized address fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
	/// Primary street address.
	#[serde(deserialize_with = "null_as_default")]
	pub street_address: String,
	/// Abbreviated primary street address.
	#[serde(deserialize_with = "null_as_default")]
	pub street_address_abbreviation: String,
	/// Secondary unit.
	#[serde(deserialize_with = "null_as_default")]
	pub secondary_address: String,
	/// City name.
	#[serde(deserialize_with = "null_as_default")]
	pub city: String,
	/// Abbreviated city name.
	#[serde(deserialize_with = "null_as_default")]
	pub city_abbreviation: String,
	/// Two-letter state code.
	#[serde(deserialize_with = "null_as_default")]
	pub state: String,
	/// Puerto Rico urbanization.
	#[serde(deserialize_with = "null_as_default")]
	pub urbanization: String,
	/// 5-digit ZIP code.
	#[serde(rename = "ZIPCode", deserialize_with = "null_as_default")]
	pub zip_code: String,
	/// ZIP+4 extension.
	#[serde(rename = "ZIPPlus4", deserialize_with = "null_as_default")]
	pub zip_plus4: String,
}

/// Delivery point details attached to a standardized address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalInfo {
	/// Delivery point code.
	#[serde(deserialize_with = "null_as_default")]
	pub delivery_point: String,
	/// Carrier route.
	#[serde(deserialize_with = "null_as_default")]
	pub carrier_route: String,
	/// Delivery point validation confirmation indicator.
	#[serde(rename = "DPVConfirmation", deserialize_with = "null_as_default")]
	pub dpv_confirmation: String,
	/// Commercial mail receiving agency indicator.
	#[serde(rename = "DPVCMRA", deserialize_with = "null_as_default")]
	pub dpv_cmra: String,
	/// Business address indicator.
	#[serde(deserialize_with = "null_as_default")]
	pub business: String,
	/// Central delivery point indicator.
	#[serde(deserialize_with = "null_as_default")]
	pub central_delivery_point: String,
	/// Vacancy indicator.
	#[serde(deserialize_with = "null_as_default")]
	pub vacant: String,
}

/// Code and text pair used for corrections and matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressCode {
	/// Code.
	#[serde(deserialize_with = "null_as_default")]
	pub code: String,
	/// Description.
	#[serde(deserialize_with = "null_as_default")]
	pub text: String,
}

/// Bearer-authenticated client for the Addresses API.
///
/// A default-constructed client is inert and answers every call with
/// [`Error::NotInitialized`].
#[derive(Clone, Debug, Default)]
pub struct AddressesClient {
	inner: Option<Arc<ApiCore>>,
}
impl AddressesClient {
	/// Builds a client rooted at `config.base_url`.
	pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
		Ok(Self { inner: Some(Arc::new(ApiCore::new(config, tokens)?)) })
	}

	/// Builds a client for the production environment.
	pub fn production(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
		Self::new(ClientConfig::parse(ADDRESSES_PRODUCTION_BASE_URL)?, tokens)
	}

	/// Builds a client for the customer testing environment.
	pub fn testing(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
		Self::new(ClientConfig::parse(ADDRESSES_TESTING_BASE_URL)?, tokens)
	}

	/// Standardizes `request` via `GET {base}/address`.
	pub async fn standardize(&self, request: &AddressRequest) -> Result<AddressResponse> {
		const KIND: CallKind = CallKind::Address;

		let span = CallSpan::new(KIND, "standardize");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let core = self.inner.as_deref().ok_or(Error::NotInitialized)?;
				let url = core.endpoint(&["address"])?;
				let builder = core.authorized(Method::GET, url).await?;
				let response = core.dispatch(builder.query(request)).await?;
				let standardized: AddressResponse = decode_json(&response.body)?;

				#[cfg(feature = "tracing")]
				tracing::debug!(
					city = %standardized.address.city,
					state = %standardized.address.state,
					zip = %standardized.address.zip_code,
					"Standardized address."
				);

				Ok(standardized)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
