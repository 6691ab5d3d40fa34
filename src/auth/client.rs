//! Client for the USPS OAuth 2.0 token and revocation endpoints.

// crates.io
use reqwest::header::{ACCEPT, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenResponse, TokenRevokeRequest, TokenSecret},
	http::{APPLICATION_JSON, ClientConfig, ReqwestHttpClient},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Production OAuth root.
pub const OAUTH_PRODUCTION_BASE_URL: &str = "https://apis.usps.com/oauth2/v3";
/// Customer testing environment OAuth root.
pub const OAUTH_TESTING_BASE_URL: &str = "https://apis-tem.usps.com/oauth2/v3";

/// Talks to `{base}/token` and `{base}/revoke`.
///
/// A default-constructed client is inert and answers every call with
/// [`Error::NotInitialized`].
#[derive(Clone, Debug, Default)]
pub struct OAuthClient {
	inner: Option<Arc<OAuthCore>>,
}
impl OAuthClient {
	/// Builds a client from `config`.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http = config.transport()?;
		let token_url = config.endpoint(&["token"])?;
		let revoke_url = config.endpoint(&["revoke"])?;

		Ok(Self { inner: Some(Arc::new(OAuthCore { http, token_url, revoke_url })) })
	}

	/// Builds a client for the production environment.
	pub fn production() -> Result<Self> {
		Self::new(ClientConfig::parse(OAUTH_PRODUCTION_BASE_URL)?)
	}

	/// Builds a client for the customer testing environment.
	pub fn testing() -> Result<Self> {
		Self::new(ClientConfig::parse(OAUTH_TESTING_BASE_URL)?)
	}

	/// Exchanges `grant` for a token.
	///
	/// The body encoding follows the grant variant; see [`TokenGrant::encode`].
	pub async fn post_token(&self, grant: &TokenGrant) -> Result<TokenResponse> {
		const KIND: CallKind = CallKind::Token;

		let span = CallSpan::new(KIND, grant.grant_type().as_str());

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let core = self.core()?;
				let encoded = grant.encode()?;
				let builder = core
					.http
					.post(core.token_url.clone())
					.header(ACCEPT, APPLICATION_JSON)
					.header(CONTENT_TYPE, encoded.content_type)
					.body(encoded.body);
				let response = core.http.dispatch(builder).await?;

				TokenResponse::parse(&response.body)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Revokes a token using HTTP Basic client authentication.
	pub async fn post_revoke(
		&self,
		client_id: &str,
		client_secret: &TokenSecret,
		request: &TokenRevokeRequest,
	) -> Result<()> {
		const KIND: CallKind = CallKind::Revoke;

		let span = CallSpan::new(KIND, "post_revoke");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let core = self.core()?;
				let encoded = request.encode();
				let builder = core
					.http
					.post(core.revoke_url.clone())
					.basic_auth(client_id, Some(client_secret.expose()))
					.header(CONTENT_TYPE, encoded.content_type)
					.body(encoded.body);

				core.http.dispatch(builder).await?;

				Ok(())
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	fn core(&self) -> Result<&OAuthCore> {
		self.inner.as_deref().ok_or(Error::NotInitialized)
	}
}

#[derive(Debug)]
struct OAuthCore {
	http: ReqwestHttpClient,
	token_url: Url,
	revoke_url: Url,
}
