//! Bearer token sources consumed by the USPS API clients.
//!
//! The API clients only see [`TokenProvider`]. [`OAuthTokenProvider`] performs the
//! client-credentials grant, caches the access token until shortly before it expires, and
//! serializes refreshes behind a single-flight guard so concurrent callers share one token
//! request. [`StaticTokenProvider`] hands out a fixed token.

// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, OAuthClient, TokenGrant, TokenSecret},
};

/// Boxed future returned by [`TokenProvider::access_token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret>> + 'a + Send>>;

/// Source of bearer tokens for outbound API calls.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Returns a bearer token valid for at least the next request.
	fn access_token(&self) -> TokenFuture<'_>;
}

/// Provider that always returns the same token.
#[derive(Clone, Debug)]
pub struct StaticTokenProvider {
	token: TokenSecret,
}
impl StaticTokenProvider {
	/// Wraps `token`.
	pub fn new(token: impl Into<TokenSecret>) -> Self {
		Self { token: token.into() }
	}
}
impl TokenProvider for StaticTokenProvider {
	fn access_token(&self) -> TokenFuture<'_> {
		let token = self.token.clone();

		Box::pin(async move { Ok(token) })
	}
}

/// Client-credentials provider with an in-process cache.
pub struct OAuthTokenProvider {
	client: OAuthClient,
	credentials: ClientCredentials,
	preemptive_window: Duration,
	cache: RwLock<Option<CachedToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl OAuthTokenProvider {
	/// Default margin subtracted from the token lifetime before it is refreshed.
	pub const DEFAULT_PREEMPTIVE_WINDOW: Duration = Duration::seconds(60);

	/// Creates a provider that exchanges `credentials` through `client`.
	pub fn new(client: OAuthClient, credentials: ClientCredentials) -> Self {
		Self {
			client,
			credentials,
			preemptive_window: Self::DEFAULT_PREEMPTIVE_WINDOW,
			cache: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Overrides the preemptive refresh window (defaults to 60 seconds).
	pub fn with_preemptive_window(mut self, window: Duration) -> Self {
		self.preemptive_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Drops the cached token so the next call performs a fresh exchange.
	pub fn invalidate(&self) {
		*self.cache.write() = None;
	}

	async fn fetch(&self) -> Result<TokenSecret> {
		if let Some(secret) = self.cached(OffsetDateTime::now_utc()) {
			return Ok(secret);
		}

		let _singleflight = self.refresh_guard.lock().await;
		let now = OffsetDateTime::now_utc();

		// A concurrent caller may have refreshed while this one waited.
		if let Some(secret) = self.cached(now) {
			return Ok(secret);
		}

		let grant = TokenGrant::ClientCredentials(self.credentials.clone());
		let response = self.client.post_token(&grant).await?;
		let secret = response.access_token().clone();

		match response.expires_in() {
			Some(lifetime) => {
				let refresh_at = now
					.checked_add(lifetime)
					.and_then(|expires_at| expires_at.checked_sub(self.preemptive_window))
					.filter(|refresh_at| *refresh_at > now);

				if let Some(refresh_at) = refresh_at {
					*self.cache.write() = Some(CachedToken { secret: secret.clone(), refresh_at });
				}

				#[cfg(feature = "tracing")]
				tracing::debug!(lifetime_secs = lifetime.whole_seconds(), "Acquired OAuth token.");
			},
			None => {
				#[cfg(feature = "tracing")]
				tracing::debug!("Acquired OAuth token without a lifetime; not caching it.");
			},
		}

		Ok(secret)
	}

	fn cached(&self, now: OffsetDateTime) -> Option<TokenSecret> {
		self.cache
			.read()
			.as_ref()
			.filter(|cached| now < cached.refresh_at)
			.map(|cached| cached.secret.clone())
	}
}
impl TokenProvider for OAuthTokenProvider {
	fn access_token(&self) -> TokenFuture<'_> {
		Box::pin(self.fetch())
	}
}
impl Debug for OAuthTokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthTokenProvider")
			.field("client_id", &self.credentials.client_id)
			.field("scope", &self.credentials.scope)
			.field("preemptive_window", &self.preemptive_window)
			.finish()
	}
}

#[derive(Clone)]
struct CachedToken {
	secret: TokenSecret,
	refresh_at: OffsetDateTime,
}
