//! Service settings for the `shipping-api` binary.
//!
//! Sources are merged in order, later ones winning: built-in defaults, an optional TOML file
//! (`SHIPPING_API_CONFIG`, default `shipping-api.toml`), then `SHIPPING_API_*` environment
//! variables.

// std
use std::{
	env,
	net::{Ipv4Addr, SocketAddr},
	path::PathBuf,
	time::Duration as StdDuration,
};
// crates.io
use figment::{
	Figment,
	providers::{Env, Format, Serialized, Toml},
};
// self
use crate::{
	_prelude::*,
	addresses::{ADDRESSES_PRODUCTION_BASE_URL, ADDRESSES_TESTING_BASE_URL, AddressesClient},
	auth::{
		ClientCredentials, OAUTH_PRODUCTION_BASE_URL, OAUTH_TESTING_BASE_URL, OAuthClient,
		OAuthTokenProvider, ScopeSet, TokenProvider, TokenSecret,
	},
	error::ConfigError,
	http::ClientConfig,
	prices::{PRICES_PRODUCTION_BASE_URL, PRICES_TESTING_BASE_URL, PricesClient},
};

/// Environment variable naming the TOML settings file.
pub const CONFIG_PATH_ENV: &str = "SHIPPING_API_CONFIG";
/// Settings file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "shipping-api.toml";
/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SHIPPING_API_";

/// USPS environment the service talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UspsEnvironment {
	/// `apis.usps.com`.
	#[default]
	Production,
	/// Customer testing environment, `apis-tem.usps.com`.
	Testing,
}

/// Settings consumed by the binary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
	/// Address the HTTP front binds to.
	pub listen: SocketAddr,
	/// USPS environment used for default base URLs.
	pub environment: UspsEnvironment,
	/// OAuth client identifier (USPS consumer key).
	pub client_id: String,
	/// OAuth client secret (USPS consumer secret).
	pub client_secret: TokenSecret,
	/// Scopes requested with the client-credentials grant.
	pub scopes: ScopeSet,
	/// Whole-request timeout for outbound calls, in seconds.
	pub timeout_secs: u64,
	/// OAuth root override.
	pub oauth_base_url: Option<Url>,
	/// Prices root override.
	pub prices_base_url: Option<Url>,
	/// Addresses root override.
	pub addresses_base_url: Option<Url>,
	/// Emit JSON log lines instead of human-readable ones.
	pub log_json: bool,
}
impl ServiceConfig {
	/// Loads settings from the default sources.
	pub fn load() -> Result<Self> {
		let path = env::var_os(CONFIG_PATH_ENV)
			.map(PathBuf::from)
			.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
		let figment = Figment::from(Serialized::defaults(Self::default()))
			.merge(Toml::file(path))
			.merge(Env::prefixed(ENV_PREFIX));

		Self::from_figment(figment)
	}

	/// Extracts and validates settings from a caller-assembled [`Figment`].
	pub fn from_figment(figment: Figment) -> Result<Self> {
		let config: Self = figment.extract().map_err(ConfigError::load)?;

		config.validate()?;

		Ok(config)
	}

	/// Ensures the OAuth credentials are present.
	pub fn validate(&self) -> Result<()> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingCredentials { field: "client_id" }.into());
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::MissingCredentials { field: "client_secret" }.into());
		}

		Ok(())
	}

	/// Outbound request timeout.
	pub fn timeout(&self) -> StdDuration {
		StdDuration::from_secs(self.timeout_secs)
	}

	/// Builds the cached client-credentials token provider.
	pub fn token_provider(&self) -> Result<Arc<dyn TokenProvider>> {
		let config = self.client_config(
			self.oauth_base_url.as_ref(),
			OAUTH_PRODUCTION_BASE_URL,
			OAUTH_TESTING_BASE_URL,
		)?;
		let client = OAuthClient::new(config)?;
		let credentials = ClientCredentials::new(self.client_id.clone(), self.client_secret.clone())
			.with_scope(self.scopes.clone());

		Ok(Arc::new(OAuthTokenProvider::new(client, credentials)))
	}

	/// Builds the Prices client.
	pub fn prices_client(&self, tokens: Arc<dyn TokenProvider>) -> Result<PricesClient> {
		let config = self.client_config(
			self.prices_base_url.as_ref(),
			PRICES_PRODUCTION_BASE_URL,
			PRICES_TESTING_BASE_URL,
		)?;

		PricesClient::new(config, tokens)
	}

	/// Builds the Addresses client.
	pub fn addresses_client(&self, tokens: Arc<dyn TokenProvider>) -> Result<AddressesClient> {
		let config = self.client_config(
			self.addresses_base_url.as_ref(),
			ADDRESSES_PRODUCTION_BASE_URL,
			ADDRESSES_TESTING_BASE_URL,
		)?;

		AddressesClient::new(config, tokens)
	}

	fn client_config(
		&self,
		base_override: Option<&Url>,
		production: &str,
		testing: &str,
	) -> Result<ClientConfig> {
		let config = match (base_override, self.environment) {
			(Some(url), _) => ClientConfig::new(url.clone()),
			(None, UspsEnvironment::Production) => ClientConfig::parse(production)?,
			(None, UspsEnvironment::Testing) => ClientConfig::parse(testing)?,
		};

		Ok(config.with_timeout(self.timeout()))
	}
}
impl Default for ServiceConfig {
	fn default() -> Self {
		Self {
			listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 4000)),
			environment: UspsEnvironment::default(),
			client_id: String::new(),
			client_secret: TokenSecret::default(),
			scopes: ScopeSet::default(),
			timeout_secs: ClientConfig::DEFAULT_TIMEOUT.as_secs(),
			oauth_base_url: None,
			prices_base_url: None,
			addresses_base_url: None,
			log_json: false,
		}
	}
}
