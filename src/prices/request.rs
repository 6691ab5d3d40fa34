//! Domestic base-rates search request.

// self
use crate::_prelude::*;

/// JSON body for `POST /base-rates/search`.
///
/// Field names follow the USPS Domestic Prices v3 documentation. Weight is in pounds and the
/// dimensions are in inches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomesticBaseRatesRequest {
	/// Origin 5-digit ZIP code.
	#[serde(rename = "originZIPCode")]
	pub origin_zip_code: String,
	/// Destination 5-digit ZIP code.
	#[serde(rename = "destinationZIPCode")]
	pub destination_zip_code: String,
	/// Package weight.
	pub weight: f64,
	/// Package length.
	#[serde(default)]
	pub length: f64,
	/// Package width.
	#[serde(default)]
	pub width: f64,
	/// Package height.
	#[serde(default)]
	pub height: f64,
	/// Mail class such as `USPS_GROUND_ADVANTAGE` or `PRIORITY_MAIL`.
	pub mail_class: String,
	/// Processing category such as `MACHINABLE`.
	#[serde(default)]
	pub processing_category: String,
	/// Rate indicator such as `SP` (single piece).
	#[serde(default)]
	pub rate_indicator: String,
	/// Destination entry facility type such as `NONE`.
	#[serde(default)]
	pub destination_entry_facility_type: String,
	/// Price type: `RETAIL`, `COMMERCIAL`, or `CONTRACT`.
	#[serde(default)]
	pub price_type: String,
	/// Mailing date as `YYYY-MM-DD`.
	#[serde(default)]
	pub mailing_date: String,
	/// Account type such as `EPS` or `MID`.
	#[serde(default)]
	pub account_type: String,
	/// Account number matching `account_type`.
	#[serde(default)]
	pub account_number: String,
	/// Whether the package has nonstandard characteristics.
	#[serde(default)]
	pub has_nonstandard_characteristics: bool,
}
impl DomesticBaseRatesRequest {
	/// Fixed Ground Advantage quote from Atlanta to Beverly Hills, served by the demo route.
	pub fn example() -> Self {
		Self {
			origin_zip_code: "30301".into(),
			destination_zip_code: "90210".into(),
			weight: 1.0,
			length: 2.0,
			width: 3.0,
			height: 3.0,
			mail_class: "USPS_GROUND_ADVANTAGE".into(),
			processing_category: "MACHINABLE".into(),
			rate_indicator: "SP".into(),
			destination_entry_facility_type: "NONE".into(),
			price_type: "COMMERCIAL".into(),
			mailing_date: "2025-12-20".into(),
			account_type: "MID".into(),
			account_number: "903950522".into(),
			has_nonstandard_characteristics: false,
		}
	}
}
