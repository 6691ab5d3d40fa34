//! Transport primitives shared by the USPS clients.
//!
//! [`ClientConfig`] captures the base URL and transport settings a client is built with.
//! [`ReqwestHttpClient`] executes a prepared request, reads the complete body, and turns
//! non-2xx statuses into [`RemoteError`] values so every caller classifies failures the same
//! way. [`with_cancellation`] lets callers holding a [`CancellationToken`] abort an operation
//! and receive [`TransportError::Cancelled`] instead of silently dropping the future.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::{
	Request, RequestBuilder,
	header::{HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
use serde::{Deserializer, de::DeserializeOwned};
use time::format_description::well_known::Rfc2822;
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, RemoteError, SerializationError, TransportError},
};

/// JSON media type used for `Accept` and `Content-Type` headers.
pub const APPLICATION_JSON: &str = "application/json";
/// Form media type used by the OAuth endpoints.
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// Construction-time settings for a USPS API client.
///
/// The values are consumed when the client is built; the resulting client never mutates
/// them, so a single instance can be shared freely across tasks.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// API root; endpoint paths are appended as additional segments.
	pub base_url: Url,
	/// Whole-request timeout applied by the transport.
	pub timeout: StdDuration,
	/// Pre-built reqwest client that overrides `timeout` when supplied.
	pub http_client: Option<ReqwestClient>,
}
impl ClientConfig {
	/// Default whole-request timeout.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Creates a configuration rooted at `base_url` with the default timeout.
	pub fn new(base_url: Url) -> Self {
		Self { base_url, timeout: Self::DEFAULT_TIMEOUT, http_client: None }
	}

	/// Parses `base_url` and creates a configuration rooted at it.
	pub fn parse(base_url: &str) -> Result<Self> {
		Ok(Self::new(Url::parse(base_url).map_err(ConfigError::from)?))
	}

	/// Overrides the base URL.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = base_url;

		self
	}

	/// Overrides the transport timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Supplies a caller-built reqwest client.
	///
	/// The client should not follow redirects; USPS endpoints answer directly.
	pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Builds the transport described by this configuration.
	pub fn transport(&self) -> Result<ReqwestHttpClient> {
		match &self.http_client {
			Some(client) => Ok(ReqwestHttpClient::with_client(client.clone())),
			None => ReqwestHttpClient::with_timeout(self.timeout),
		}
	}

	/// Resolves an endpoint below the base URL.
	pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		endpoint(&self.base_url, segments)
	}
}

/// Fully-read HTTP response with a 2xx status.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Complete response body.
	pub body: Vec<u8>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that applies `timeout` to every request and never follows redirects.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Finalizes `builder`, executes it, and reads the whole body before inspecting the status.
	///
	/// Non-2xx statuses become [`Error::Remote`] with a best-effort decoded body.
	pub async fn dispatch(&self, builder: RequestBuilder) -> Result<RawResponse> {
		let request = builder.build().map_err(ConfigError::http_request)?;

		self.execute(request).await
	}

	async fn execute(&self, request: Request) -> Result<RawResponse> {
		let response = self.0.execute(request).await.map_err(TransportError::from)?;
		let status = response.status();
		let retry_after = parse_retry_after(response.headers());
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		if !status.is_success() {
			return Err(RemoteError::from_body(status.as_u16(), &body, retry_after).into());
		}

		Ok(RawResponse { status: status.as_u16(), body })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

/// Races `fut` against `cancel`, returning [`TransportError::Cancelled`] once the token fires.
///
/// The losing future is dropped, which aborts any in-flight request it owns.
pub async fn with_cancellation<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(TransportError::Cancelled.into()),
		result = fut => result,
	}
}

/// Appends `segments` to `base`, ignoring a trailing slash on the base path.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::InvalidBaseUrl { url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}

/// Decodes a JSON body, reporting the path of the first field that fails.
pub fn decode_json<T>(body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| SerializationError::from(e).into())
}

/// Field deserializer that reads JSON `null` as the type's default value.
///
/// Pair with `#[serde(default)]` so absent and `null` fields decode the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return i64::try_from(secs).ok().map(Duration::seconds);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	#[test]
	fn endpoint_appends_segments_to_versioned_roots() {
		let resolved = endpoint(&url("https://apis.usps.com/prices/v3"), &["base-rates", "search"])
			.expect("Versioned root should accept segments.");

		assert_eq!(resolved.as_str(), "https://apis.usps.com/prices/v3/base-rates/search");

		let resolved = endpoint(&url("https://apis.usps.com/prices/v3/"), &["base-rates", "search"])
			.expect("Trailing slash should be tolerated.");

		assert_eq!(resolved.as_str(), "https://apis.usps.com/prices/v3/base-rates/search");

		let resolved = endpoint(&url("http://127.0.0.1:8080"), &["token"])
			.expect("Bare host should accept segments.");

		assert_eq!(resolved.as_str(), "http://127.0.0.1:8080/token");
	}

	#[test]
	fn endpoint_rejects_opaque_urls() {
		let err = endpoint(&url("mailto:ops@example.com"), &["token"])
			.expect_err("Opaque URLs cannot carry path segments.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidBaseUrl { .. })));
	}

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(120)));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
	}

	#[test]
	fn retry_after_ignores_delays_beyond_the_duration_range() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("18446744073709551615"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("9223372036854775807"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(i64::MAX)));
	}

	#[test]
	fn null_fields_decode_as_defaults() {
		#[derive(Debug, Default, Deserialize)]
		#[serde(default)]
		struct Fields {
			#[serde(deserialize_with = "null_as_default")]
			name: String,
			#[serde(deserialize_with = "null_as_default")]
			tags: Vec<String>,
			#[serde(deserialize_with = "null_as_default")]
			price: f64,
		}

		let fields: Fields = decode_json(br#"{"name":null,"tags":null,"price":null}"#)
			.expect("Null fields should decode.");

		assert_eq!(fields.name, "");
		assert!(fields.tags.is_empty());
		assert_eq!(fields.price, 0.0);

		let fields: Fields =
			decode_json(br#"{"name":"ok","price":1.5}"#).expect("Present fields should decode.");

		assert_eq!(fields.name, "ok");
		assert_eq!(fields.price, 1.5);
	}

	#[tokio::test]
	async fn cancellation_wins_over_pending_work() {
		let cancel = CancellationToken::new();

		cancel.cancel();

		let err = with_cancellation(&cancel, std::future::pending::<Result<()>>())
			.await
			.expect_err("A fired token should abort pending work.");

		assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
	}

	#[tokio::test]
	async fn completed_work_passes_through() {
		let cancel = CancellationToken::new();
		let value = with_cancellation(&cancel, async { Ok(7) })
			.await
			.expect("Work should finish when the token never fires.");

		assert_eq!(value, 7);
	}
}
