//! Shared plumbing for the bearer-authenticated USPS API clients.

// crates.io
use reqwest::{Method, RequestBuilder, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	auth::TokenProvider,
	error::AuthError,
	http::{APPLICATION_JSON, ClientConfig, RawResponse, ReqwestHttpClient},
};

/// Transport, base URL, and token source owned by a built client.
pub(crate) struct ApiCore {
	http: ReqwestHttpClient,
	base_url: Url,
	tokens: Arc<dyn TokenProvider>,
}
impl ApiCore {
	pub(crate) fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
		let http = config.transport()?;

		Ok(Self { http, base_url: config.base_url, tokens })
	}

	pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		crate::http::endpoint(&self.base_url, segments)
	}

	/// Acquires a bearer token and starts a JSON request to `url`.
	///
	/// No request is built when the provider fails.
	pub(crate) async fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder> {
		let token = self
			.tokens
			.access_token()
			.await
			.map_err(AuthError::token_acquisition)?;

		Ok(self
			.http
			.request(method, url)
			.bearer_auth(token.expose())
			.header(ACCEPT, APPLICATION_JSON))
	}

	pub(crate) async fn dispatch(&self, builder: RequestBuilder) -> Result<RawResponse> {
		self.http.dispatch(builder).await
	}
}
impl Debug for ApiCore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiCore").field("base_url", &self.base_url.as_str()).finish()
	}
}
