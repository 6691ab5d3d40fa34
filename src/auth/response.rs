//! Token endpoint response shapes and the two-step parser that selects between them.

// self
use crate::{_prelude::*, auth::TokenSecret, http::decode_json};

/// Access token issued by a client-credentials exchange.
///
/// USPS returns Apigee-style metadata next to the RFC 6749 fields; everything except
/// `access_token` is optional so additions upstream never break decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AccessTokenResponse {
	/// Bearer token to present on API calls.
	pub access_token: TokenSecret,
	/// Token type, normally `Bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
	/// Issue instant in milliseconds since the Unix epoch.
	#[serde(default)]
	pub issued_at: Option<i64>,
	/// Lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Token status reported by the issuer (for example `approved`).
	#[serde(default)]
	pub status: Option<String>,
	/// Granted scopes, space-delimited.
	#[serde(default)]
	pub scope: Option<String>,
	/// Issuer identifier.
	#[serde(default)]
	pub issuer: Option<String>,
	/// Client identifier the token was issued to.
	#[serde(default)]
	pub client_id: Option<String>,
	/// Registered application name.
	#[serde(default)]
	pub application_name: Option<String>,
	/// API products the token grants access to.
	#[serde(default)]
	pub api_products: Option<String>,
	/// Issuer public key, when returned.
	#[serde(default)]
	pub public_key: Option<String>,
}

/// Access token plus refresh token, issued by refresh and authorization-code exchanges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokensResponse {
	/// Access token fields shared with [`AccessTokenResponse`].
	#[serde(flatten)]
	pub access: AccessTokenResponse,
	/// Refresh token for subsequent `refresh_token` grants.
	pub refresh_token: TokenSecret,
	/// Refresh token issue instant in milliseconds since the Unix epoch.
	#[serde(default)]
	pub refresh_token_issued_at: Option<i64>,
	/// Refresh token lifetime in seconds.
	#[serde(default)]
	pub refresh_token_expires_in: Option<i64>,
	/// Refresh token status reported by the issuer.
	#[serde(default)]
	pub refresh_token_status: Option<String>,
	/// Number of times the refresh token has been used.
	#[serde(default)]
	pub refresh_count: Option<i64>,
}

/// Successful token endpoint response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenResponse {
	/// Response without a refresh token.
	AccessToken(AccessTokenResponse),
	/// Response carrying a refresh token.
	Tokens(TokensResponse),
}
impl TokenResponse {
	/// Parses a 2xx token endpoint body.
	///
	/// The body is first checked for a non-empty `refresh_token`; the matching full shape is
	/// decoded afterwards so failures report the JSON path of the offending field.
	pub fn parse(body: &[u8]) -> Result<Self> {
		#[derive(Deserialize)]
		struct Shape {
			#[serde(default)]
			refresh_token: Option<String>,
		}

		let shape: Shape = decode_json(body)?;

		if shape.refresh_token.is_some_and(|token| !token.is_empty()) {
			Ok(Self::Tokens(decode_json(body)?))
		} else {
			Ok(Self::AccessToken(decode_json(body)?))
		}
	}

	/// Access token fields common to both shapes.
	pub fn access(&self) -> &AccessTokenResponse {
		match self {
			Self::AccessToken(response) => response,
			Self::Tokens(response) => &response.access,
		}
	}

	/// Bearer token carried by the response.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access().access_token
	}

	/// Lifetime of the access token, if the issuer reported a positive one.
	pub fn expires_in(&self) -> Option<Duration> {
		self.access().expires_in.filter(|secs| *secs > 0).map(Duration::seconds)
	}

	/// Refresh token, when present.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		match self {
			Self::AccessToken(_) => None,
			Self::Tokens(response) => Some(&response.refresh_token),
		}
	}
}

/// RFC 6749 error body returned by the OAuth endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardErrorResponse {
	/// Error code such as `invalid_client`.
	#[serde(default)]
	pub error: String,
	/// Human-readable description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_description: Option<String>,
}
