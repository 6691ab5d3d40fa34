//! Route handlers.

// crates.io
use axum::{
	Json,
	extract::{
		Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
};
use serde_json::value::RawValue;
// self
use crate::{
	_prelude::*,
	addresses::{AddressRequest, AddressResponse},
	prices::{DomesticBaseRatesRequest, DomesticBaseRatesResponse},
	server::{ApiError, AppState},
};

/// Liveness check body.
#[derive(Debug, Serialize)]
pub struct Health {
	/// Always `ok`.
	pub status: &'static str,
}

/// Envelope for standardized addresses.
#[derive(Debug, Serialize)]
pub struct AddressEnvelope {
	/// Standardized address.
	pub address: AddressResponse,
}

/// Envelope for rate searches: the typed view next to the verbatim upstream payload.
#[derive(Debug, Serialize)]
pub struct RatesEnvelope {
	/// Typed view of the response.
	pub rates: DomesticBaseRatesResponse,
	/// Upstream body.
	pub raw: RawBody,
}

/// Upstream body embedded in [`RatesEnvelope`].
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RawBody {
	/// Valid JSON, embedded verbatim.
	Json(Box<RawValue>),
	/// Anything else, embedded as a string.
	Text(String),
}
impl From<&DomesticBaseRatesResponse> for RawBody {
	fn from(response: &DomesticBaseRatesResponse) -> Self {
		match response.raw_json() {
			Some(raw) => Self::Json(raw),
			None => Self::Text(String::from_utf8_lossy(response.raw()).into_owned()),
		}
	}
}

/// `GET /healthz`.
pub async fn healthz() -> Json<Health> {
	Json(Health { status: "ok" })
}

/// `POST /v1/addresses/standardize` with a JSON body.
pub async fn standardize_json(
	State(state): State<AppState>,
	body: Result<Json<AddressRequest>, JsonRejection>,
) -> Result<Json<AddressEnvelope>, ApiError> {
	let Json(request) = body?;

	standardize(&state, request).await
}

/// `GET /v1/addresses/standardize` with query-encoded fields.
pub async fn standardize_query(
	State(state): State<AppState>,
	query: Result<Query<AddressRequest>, QueryRejection>,
) -> Result<Json<AddressEnvelope>, ApiError> {
	let Query(request) = query?;

	standardize(&state, request).await
}

/// `POST /v1/rates/search` with a JSON [`DomesticBaseRatesRequest`].
pub async fn search_rates(
	State(state): State<AppState>,
	body: Result<Json<DomesticBaseRatesRequest>, JsonRejection>,
) -> Result<Json<RatesEnvelope>, ApiError> {
	let Json(request) = body?;

	rates(&state, &request).await
}

/// `GET /v1/rates/example`: searches the fixed demo request.
pub async fn example_rates(
	State(state): State<AppState>,
) -> Result<Json<RatesEnvelope>, ApiError> {
	rates(&state, &DomesticBaseRatesRequest::example()).await
}

async fn standardize(
	state: &AppState,
	request: AddressRequest,
) -> Result<Json<AddressEnvelope>, ApiError> {
	let address = state.addresses.standardize(&request).await?;

	Ok(Json(AddressEnvelope { address }))
}

async fn rates(
	state: &AppState,
	request: &DomesticBaseRatesRequest,
) -> Result<Json<RatesEnvelope>, ApiError> {
	let rates = state.prices.search_base_rates(request).await?;
	let raw = RawBody::from(&rates);

	Ok(Json(RatesEnvelope { rates, raw }))
}

#[cfg(test)]
mod tests {
	// crates.io
	use axum::{
		body::{self, Body},
		http::{Request, StatusCode, header::CONTENT_TYPE},
	};
	use httpmock::prelude::*;
	use serde_json::{Value, json};
	use tower::ServiceExt;
	// self
	use super::*;
	use crate::{_preludet::*, server::router};

	fn app(server: &MockServer) -> axum::Router {
		let base = server.base_url();

		router(AppState {
			prices: test_prices_client(&base),
			addresses: test_addresses_client(&base),
		})
	}

	async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
		let response = app.oneshot(request).await.expect("Router should answer.");
		let status = response.status();
		let bytes = body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Response body should be readable.");

		(status, serde_json::from_slice(&bytes).expect("Response body should be JSON."))
	}

	fn post_json(uri: &str, body: Value) -> Request<Body> {
		Request::post(uri)
			.header(CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.expect("Request should build.")
	}

	#[tokio::test]
	async fn healthz_answers_ok() {
		let server = MockServer::start_async().await;
		let request = Request::get("/healthz").body(Body::empty()).expect("Request should build.");
		let (status, body) = call(app(&server), request).await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!({ "status": "ok" }));
	}

	#[tokio::test]
	async fn rate_search_wraps_typed_and_raw_views() {
		let server = MockServer::start_async().await;
		let upstream = server
			.mock_async(|when, then| {
				when.method(POST)
					.path("/base-rates/search")
					.header("authorization", format!("Bearer {TEST_BEARER}"))
					.json_body(json!({
						"originZIPCode": "10001",
						"destinationZIPCode": "60601",
						"weight": 2.5,
						"length": 0.0,
						"width": 0.0,
						"height": 0.0,
						"mailClass": "PRIORITY_MAIL",
						"processingCategory": "",
						"rateIndicator": "",
						"destinationEntryFacilityType": "",
						"priceType": "",
						"mailingDate": "",
						"accountType": "",
						"accountNumber": "",
						"hasNonstandardCharacteristics": false,
					}));
				then.status(200)
					.header("content-type", "application/json")
					.body(r#"{"rates":[{"SKU":"DPXX0XXXXC05010","price":11.1}],"extra":1}"#);
			})
			.await;
		let request = post_json(
			"/v1/rates/search",
			json!({
				"originZIPCode": "10001",
				"destinationZIPCode": "60601",
				"weight": 2.5,
				"mailClass": "PRIORITY_MAIL",
			}),
		);
		let (status, body) = call(app(&server), request).await;

		upstream.assert_async().await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["rates"]["rates"][0]["SKU"], "DPXX0XXXXC05010");
		assert_eq!(body["raw"]["extra"], 1);
	}

	#[tokio::test]
	async fn example_route_sends_the_fixed_request() {
		let server = MockServer::start_async().await;
		let upstream = server
			.mock_async(|when, then| {
				let expected = serde_json::to_value(DomesticBaseRatesRequest::example())
					.expect("Example should serialize.");

				when.method(POST).path("/base-rates/search").json_body(expected);
				then.status(200).body(r#"{"rates":[]}"#);
			})
			.await;
		let request =
			Request::get("/v1/rates/example").body(Body::empty()).expect("Request should build.");
		let (status, body) = call(app(&server), request).await;

		upstream.assert_async().await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["raw"], json!({ "rates": [] }));
	}

	#[tokio::test]
	async fn upstream_401_is_relayed() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(POST).path("/base-rates/search");
				then.status(401)
					.header("content-type", "application/json")
					.body(r#"{"error":"invalid_client"}"#);
			})
			.await;

		let request =
			Request::get("/v1/rates/example").body(Body::empty()).expect("Request should build.");
		let (status, body) = call(app(&server), request).await;

		assert_eq!(status, StatusCode::UNAUTHORIZED);
		assert_eq!(body["error"], "upstream_rejected");
		assert_eq!(body["upstreamStatus"], 401);
		assert_eq!(body["upstream"], json!({ "error": "invalid_client" }));
	}

	#[tokio::test]
	async fn upstream_5xx_becomes_bad_gateway() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(GET).path("/address");
				then.status(503).body("maintenance");
			})
			.await;

		let request = Request::get("/v1/addresses/standardize?streetAddress=1+Main+St&state=VA")
			.body(Body::empty())
			.expect("Request should build.");
		let (status, body) = call(app(&server), request).await;

		assert_eq!(status, StatusCode::BAD_GATEWAY);
		assert_eq!(body["error"], "upstream_failed");
		assert_eq!(body["upstreamStatus"], 503);
	}

	#[tokio::test]
	async fn malformed_bodies_are_rejected_before_any_upstream_call() {
		let server = MockServer::start_async().await;
		let upstream = server
			.mock_async(|when, then| {
				when.method(POST).path("/base-rates/search");
				then.status(200).body("{}");
			})
			.await;
		let request = post_json("/v1/rates/search", json!({ "originZIPCode": 30301 }));
		let (status, body) = call(app(&server), request).await;

		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "bad_request");

		upstream.assert_calls_async(0).await;
	}

	#[tokio::test]
	async fn addresses_accept_json_and_query_input() {
		let server = MockServer::start_async().await;
		let upstream = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/address")
					.query_param("streetAddress", "3120 M St")
					.query_param("city", "Washington")
					.query_param("state", "DC");
				then.status(200).header("content-type", "application/json").body(
					r#"{"address":{"streetAddress":"3120 M ST NW","city":"WASHINGTON","state":"DC","ZIPCode":"20027","ZIPPlus4":"3704"}}"#,
				);
			})
			.await;
		let json_request = post_json(
			"/v1/addresses/standardize",
			json!({ "streetAddress": "3120 M St", "city": "Washington", "state": "DC" }),
		);
		let (status, body) = call(app(&server), json_request).await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["address"]["address"]["ZIPPlus4"], "3704");

		let query_request = Request::get(
			"/v1/addresses/standardize?streetAddress=3120%20M%20St&city=Washington&state=DC",
		)
		.body(Body::empty())
		.expect("Request should build.");
		let (status, body) = call(app(&server), query_request).await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["address"]["address"]["city"], "WASHINGTON");

		upstream.assert_calls_async(2).await;
	}

	#[tokio::test]
	async fn uninitialized_clients_are_internal_errors() {
		let request =
			Request::get("/v1/rates/example").body(Body::empty()).expect("Request should build.");
		let (status, body) = call(router(AppState::default()), request).await;

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body["error"], "internal");
		assert_eq!(body["message"], "Client not initialized.");
	}
}
