// std
use std::time::{Duration as StdDuration, Instant};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use shipping_api::{
	_preludet::*,
	CancellationToken,
	auth::{ClientCredentials, OAuthClient, OAuthTokenProvider, TokenProvider},
	error::{AuthError, TransportError},
	http::{ClientConfig, with_cancellation},
	prices::{DomesticBaseRatesRequest, PricesClient},
};

fn ground_advantage_request() -> DomesticBaseRatesRequest {
	DomesticBaseRatesRequest {
		origin_zip_code: "30301".into(),
		destination_zip_code: "90210".into(),
		weight: 1.0,
		mail_class: "USPS_GROUND_ADVANTAGE".into(),
		..DomesticBaseRatesRequest::example()
	}
}

#[tokio::test]
async fn search_sends_one_signed_post_and_keeps_raw_bytes() {
	let server = MockServer::start_async().await;
	let body = r#"{"rates":[{"SKU":"X","price":5.5}]}"#;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/base-rates/search")
				.header("authorization", format!("Bearer {TEST_BEARER}"))
				.header("accept", "application/json")
				.header("content-type", "application/json")
				.json_body(json!({
					"originZIPCode": "30301",
					"destinationZIPCode": "90210",
					"weight": 1.0,
					"length": 2.0,
					"width": 3.0,
					"height": 3.0,
					"mailClass": "USPS_GROUND_ADVANTAGE",
					"processingCategory": "MACHINABLE",
					"rateIndicator": "SP",
					"destinationEntryFacilityType": "NONE",
					"priceType": "COMMERCIAL",
					"mailingDate": "2025-12-20",
					"accountType": "MID",
					"accountNumber": "903950522",
					"hasNonstandardCharacteristics": false,
				}));
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;
	let client = test_prices_client(&server.base_url());
	let response = client
		.search_base_rates(&ground_advantage_request())
		.await
		.expect("Rate search should succeed against the mock.");

	mock.assert_calls_async(1).await;

	assert_eq!(response.rates[0].sku, "X");
	assert_eq!(response.rates[0].price, 5.5);
	assert_eq!(response.raw(), body.as_bytes());
}

#[tokio::test]
async fn non_json_success_bodies_still_return_raw() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/base-rates/search");
			then.status(200).body("not json");
		})
		.await;

	let response = test_prices_client(&server.base_url())
		.search_base_rates(&DomesticBaseRatesRequest::example())
		.await
		.expect("Typed decoding is best-effort.");

	assert!(response.rates.is_empty());
	assert_eq!(response.raw(), b"not json");
}

#[tokio::test]
async fn nulls_and_mismatched_sections_keep_decoded_rates() {
	let server = MockServer::start_async().await;
	let body = r#"{"totalBasePrice":5.5,"rates":[{"SKU":"X","price":5.5,"description":null}],"meta":"v3"}"#;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/base-rates/search");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;

	let response = test_prices_client(&server.base_url())
		.search_base_rates(&DomesticBaseRatesRequest::example())
		.await
		.expect("Typed decoding is best-effort.");

	assert_eq!(response.total_base_price, Some(5.5));
	assert_eq!(response.rates.len(), 1);
	assert_eq!(response.rates[0].sku, "X");
	assert!(response.meta.is_empty());
	assert_eq!(response.raw(), body.as_bytes());
}

#[tokio::test]
async fn non_2xx_becomes_remote_error_with_status() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/base-rates/search");
			then.status(401)
				.header("content-type", "application/json")
				.header("retry-after", "7")
				.body(r#"{"error":"invalid_client"}"#);
		})
		.await;

	let err = test_prices_client(&server.base_url())
		.search_base_rates(&ground_advantage_request())
		.await
		.expect_err("A 401 must surface as an error.");
	let Error::Remote(remote) = err else {
		panic!("Expected a remote error, got {err:?}.");
	};

	assert_eq!(remote.status, 401);
	assert_eq!(remote.retry_after, Some(Duration::seconds(7)));
	assert_eq!(
		remote.oauth_error().expect("Body should decode as an OAuth error.").error,
		"invalid_client"
	);
}

#[tokio::test]
async fn undecodable_error_bodies_keep_the_status() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/base-rates/search");
			then.status(500).body("<html>oops</html>");
		})
		.await;

	let err = test_prices_client(&server.base_url())
		.search_base_rates(&ground_advantage_request())
		.await
		.expect_err("A 500 must surface as an error.");

	assert!(matches!(
		err,
		Error::Remote(ref remote) if remote.status == 500 && remote.body.is_none()
	));
}

#[tokio::test]
async fn token_failure_prevents_the_rate_request() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalid_client","error_description":"Bad credentials"}"#);
		})
		.await;
	let rates = server
		.mock_async(|when, then| {
			when.method(POST).path("/prices/base-rates/search");
			then.status(200).body("{}");
		})
		.await;
	let oauth = OAuthClient::new(test_client_config(&server.url("/oauth")))
		.expect("OAuth client should build.");
	let tokens: Arc<dyn TokenProvider> = Arc::new(OAuthTokenProvider::new(
		oauth,
		ClientCredentials::new("consumer-key", "consumer-secret"),
	));
	let client = PricesClient::new(test_client_config(&server.url("/prices")), tokens)
		.expect("Prices client should build.");
	let err = client
		.search_base_rates(&ground_advantage_request())
		.await
		.expect_err("Token failure must abort the search.");

	token.assert_calls_async(1).await;
	rates.assert_calls_async(0).await;

	let Error::Auth(auth) = &err else {
		panic!("Expected an auth error, got {err:?}.");
	};

	assert!(matches!(auth, AuthError::TokenAcquisition { .. }));
	assert!(matches!(auth.cause(), Error::Remote(remote) if remote.status == 401));
	assert_eq!(err.to_string(), "Failed to acquire an OAuth token.");
}

#[tokio::test]
async fn cancellation_aborts_an_in_flight_search() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/base-rates/search");
			then.status(200).delay(StdDuration::from_secs(5)).body("{}");
		})
		.await;

	let client = test_prices_client(&server.base_url());
	let cancel = CancellationToken::new();
	let trigger = cancel.clone();

	tokio::spawn(async move {
		tokio::time::sleep(StdDuration::from_millis(100)).await;
		trigger.cancel();
	});

	let started = Instant::now();
	let request = ground_advantage_request();
	let err = with_cancellation(&cancel, client.search_base_rates(&request))
		.await
		.expect_err("Cancelled searches must fail.");

	assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
	assert!(started.elapsed() < StdDuration::from_secs(2), "Cancellation must return promptly.");
}

#[tokio::test]
async fn transport_timeout_is_classified() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/base-rates/search");
			then.status(200).delay(StdDuration::from_secs(3)).body("{}");
		})
		.await;

	let config =
		test_client_config(&server.base_url()).with_timeout(StdDuration::from_millis(200));
	let client = PricesClient::new(config, static_tokens()).expect("Prices client should build.");
	let err = client
		.search_base_rates(&ground_advantage_request())
		.await
		.expect_err("Slow upstreams must time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
}

#[tokio::test]
async fn unreachable_upstream_is_a_network_error() {
	let config = ClientConfig::parse("http://127.0.0.1:9").expect("URL should parse.");
	let client = PricesClient::new(config, static_tokens()).expect("Prices client should build.");
	let err = client
		.search_base_rates(&ground_advantage_request())
		.await
		.expect_err("Connection refused must surface as an error.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
}

#[tokio::test]
async fn zero_valued_client_fails_without_io() {
	let err = PricesClient::default()
		.search_base_rates(&ground_advantage_request())
		.await
		.expect_err("Zero-valued clients must fail.");

	assert!(matches!(err, Error::NotInitialized));
}
