//! Domestic base-rates search response.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, value::RawValue};
// self
use crate::{_prelude::*, http::null_as_default};

/// Typed view of a base-rates search response plus the unmodified payload.
///
/// Every field is optional on the wire. Fields USPS adds later are ignored by the typed view
/// and remain available through [`DomesticBaseRatesResponse::raw`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomesticBaseRatesResponse {
	/// Total base postage.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total_base_price: Option<f64>,
	/// Rate line items.
	#[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
	pub rates: Vec<Rate>,
	/// Product-level base rates.
	#[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
	pub products: Vec<BaseRate>,
	/// Alternate product-level base rates.
	#[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
	pub base_rates: Vec<BaseRate>,
	/// Free-form metadata.
	#[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "null_as_default")]
	pub meta: Map<String, Value>,
	#[serde(skip)]
	raw: Vec<u8>,
}
impl DomesticBaseRatesResponse {
	/// Builds a response from the raw body, decoding the typed view on a best-effort basis.
	///
	/// Each top-level section decodes on its own: a section that does not fit its typed shape
	/// stays empty while the others are kept. A body that is not a JSON object yields an empty
	/// typed view. The raw bytes are kept either way.
	pub fn from_raw(body: Vec<u8>) -> Self {
		let mut response = match serde_json::from_slice::<Map<String, Value>>(&body) {
			Ok(mut sections) => Self {
				total_base_price: section(&mut sections, "totalBasePrice"),
				rates: section(&mut sections, "rates").unwrap_or_default(),
				products: section(&mut sections, "products").unwrap_or_default(),
				base_rates: section(&mut sections, "baseRates").unwrap_or_default(),
				meta: section(&mut sections, "meta").unwrap_or_default(),
				raw: Vec::new(),
			},
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "Base rates response is not a JSON object.");

				Self::default()
			},
		};

		response.raw = body;

		response
	}

	/// Unmodified response body.
	pub fn raw(&self) -> &[u8] {
		&self.raw
	}

	/// Response body as embeddable JSON, when the body is valid JSON.
	pub fn raw_json(&self) -> Option<Box<RawValue>> {
		let text = String::from_utf8(self.raw.clone()).ok()?;

		RawValue::from_string(text).ok()
	}
}

fn section<T>(sections: &mut Map<String, Value>, key: &'static str) -> Option<T>
where
	T: DeserializeOwned,
{
	let value = sections.remove(key).filter(|value| !value.is_null())?;

	match serde_path_to_error::deserialize(value) {
		Ok(typed) => Some(typed),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(
				section = key,
				path = %_e.path(),
				error = %_e.inner(),
				"Base rates section did not match the typed view."
			);

			None
		},
	}
}

/// Rate line item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rate {
	/// Stock keeping unit identifying the price.
	#[serde(rename = "SKU", deserialize_with = "null_as_default")]
	pub sku: String,
	/// Human-readable description.
	#[serde(deserialize_with = "null_as_default")]
	pub description: String,
	/// Price type the rate was computed for.
	#[serde(deserialize_with = "null_as_default")]
	pub price_type: String,
	/// Postage amount.
	#[serde(deserialize_with = "null_as_default")]
	pub price: f64,
	/// Rated weight.
	#[serde(deserialize_with = "null_as_default")]
	pub weight: f64,
	/// Dimensional weight.
	#[serde(deserialize_with = "null_as_default")]
	pub dim_weight: f64,
	/// Fee entries, passed through unchanged.
	#[serde(deserialize_with = "null_as_default")]
	pub fees: Vec<Value>,
	/// First day the price is effective.
	#[serde(deserialize_with = "null_as_default")]
	pub start_date: String,
	/// Last day the price is effective.
	#[serde(deserialize_with = "null_as_default")]
	pub end_date: String,
	/// Warnings attached to the rate.
	#[serde(deserialize_with = "null_as_default")]
	pub warnings: Vec<Warning>,
	/// Mail class.
	#[serde(deserialize_with = "null_as_default")]
	pub mail_class: String,
	/// Zone between origin and destination.
	#[serde(deserialize_with = "null_as_default")]
	pub zone: String,
	/// Processing category.
	#[serde(deserialize_with = "null_as_default")]
	pub processing_category: String,
	/// Destination entry facility type.
	#[serde(deserialize_with = "null_as_default")]
	pub destination_entry_facility_type: String,
	/// Rate indicator.
	#[serde(deserialize_with = "null_as_default")]
	pub rate_indicator: String,
}

/// Warning attached to a [`Rate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Warning {
	/// Warning code.
	#[serde(deserialize_with = "null_as_default")]
	pub warning_code: String,
	/// Warning text.
	#[serde(deserialize_with = "null_as_default")]
	pub warning_description: String,
}

/// Product-level base rate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseRate {
	/// Service type.
	#[serde(deserialize_with = "null_as_default")]
	pub service_type: String,
	/// Mail class.
	#[serde(deserialize_with = "null_as_default")]
	pub mail_class: String,
	/// Zone.
	#[serde(deserialize_with = "null_as_default")]
	pub zone: String,
	/// Base amount before surcharges.
	#[serde(deserialize_with = "null_as_default")]
	pub base_amount: f64,
	/// Total amount including surcharges.
	#[serde(deserialize_with = "null_as_default")]
	pub total_amount: f64,
	/// ISO currency code.
	#[serde(deserialize_with = "null_as_default")]
	pub currency: String,
	/// Expected delivery days.
	#[serde(deserialize_with = "null_as_default")]
	pub delivery_days: String,
	/// Expected delivery date.
	#[serde(deserialize_with = "null_as_default")]
	pub delivery_date: String,
	/// Surcharges applied to the base amount.
	#[serde(deserialize_with = "null_as_default")]
	pub surcharges: Vec<Surcharge>,
}

/// Surcharge applied to a [`BaseRate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Surcharge {
	/// Surcharge type.
	#[serde(rename = "type", deserialize_with = "null_as_default")]
	pub kind: String,
	/// Surcharge amount.
	#[serde(deserialize_with = "null_as_default")]
	pub amount: f64,
}
