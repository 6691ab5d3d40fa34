//! OAuth grant requests accepted by the USPS token endpoint, and token revocation requests.
//!
//! The token endpoint accepts a different body encoding per grant: client credentials travel
//! form-encoded while refresh-token and authorization-code exchanges travel as JSON. Each
//! credential type owns its `encode` method and [`TokenGrant`] selects between them
//! explicitly.

// crates.io
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenSecret},
	error::SerializationError,
	http::{APPLICATION_FORM, APPLICATION_JSON},
};

/// OAuth 2.0 grant types understood by the USPS token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Client Credentials grant for app-only tokens.
	ClientCredentials,
	/// Refresh Token grant for long-lived sessions.
	RefreshToken,
	/// Authorization Code grant.
	AuthorizationCode,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::ClientCredentials => "client_credentials",
			GrantType::RefreshToken => "refresh_token",
			GrantType::AuthorizationCode => "authorization_code",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request body ready to be sent, paired with its media type.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedBody {
	/// Value for the `Content-Type` header.
	pub content_type: &'static str,
	/// Encoded body bytes.
	pub body: Vec<u8>,
}
impl Debug for EncodedBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// Bodies carry client secrets.
		f.debug_struct("EncodedBody")
			.field("content_type", &self.content_type)
			.field("len", &self.body.len())
			.finish()
	}
}

/// Client credentials exchanged for an application access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCredentials {
	/// OAuth client identifier (USPS consumer key).
	pub client_id: String,
	/// OAuth client secret (USPS consumer secret).
	pub client_secret: TokenSecret,
	/// Requested scopes; omitted from the body when empty.
	pub scope: ScopeSet,
}
impl ClientCredentials {
	/// Creates credentials without an explicit scope.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<TokenSecret>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			scope: ScopeSet::default(),
		}
	}

	/// Requests the provided scopes.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Encodes the grant as `application/x-www-form-urlencoded`.
	pub fn encode(&self) -> EncodedBody {
		let mut form = FormSerializer::new(String::new());

		form.append_pair("grant_type", GrantType::ClientCredentials.as_str())
			.append_pair("client_id", &self.client_id)
			.append_pair("client_secret", self.client_secret.expose());

		if !self.scope.is_empty() {
			form.append_pair("scope", &self.scope.normalized());
		}

		EncodedBody { content_type: APPLICATION_FORM, body: form.finish().into_bytes() }
	}
}

/// Refresh token exchanged for a new access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshTokenCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Refresh token issued by a previous exchange.
	pub refresh_token: TokenSecret,
	/// Requested scopes; omitted from the body when empty.
	pub scope: ScopeSet,
}
impl RefreshTokenCredentials {
	/// Creates a refresh request without an explicit scope.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			refresh_token: refresh_token.into(),
			scope: ScopeSet::default(),
		}
	}

	/// Encodes the grant as `application/json`.
	pub fn encode(&self) -> Result<EncodedBody> {
		#[derive(Serialize)]
		struct Wire<'a> {
			grant_type: &'static str,
			client_id: &'a str,
			client_secret: &'a str,
			refresh_token: &'a str,
			#[serde(skip_serializing_if = "Option::is_none")]
			scope: Option<String>,
		}

		encode_json(&Wire {
			grant_type: GrantType::RefreshToken.as_str(),
			client_id: &self.client_id,
			client_secret: self.client_secret.expose(),
			refresh_token: self.refresh_token.expose(),
			scope: optional_scope(&self.scope),
		})
	}
}

/// Authorization code exchanged for access and refresh tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationCodeCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Authorization code returned to the redirect URI.
	pub code: TokenSecret,
	/// Redirect URI used when the code was issued.
	pub redirect_uri: Url,
	/// PKCE verifier, when the authorization request carried a challenge.
	pub code_verifier: Option<TokenSecret>,
	/// Requested scopes; omitted from the body when empty.
	pub scope: ScopeSet,
}
impl AuthorizationCodeCredentials {
	/// Creates an authorization-code exchange.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<TokenSecret>,
		code: impl Into<TokenSecret>,
		redirect_uri: Url,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			code: code.into(),
			redirect_uri,
			code_verifier: None,
			scope: ScopeSet::default(),
		}
	}

	/// Attaches a PKCE verifier.
	pub fn with_code_verifier(mut self, verifier: impl Into<TokenSecret>) -> Self {
		self.code_verifier = Some(verifier.into());

		self
	}

	/// Encodes the grant as `application/json`.
	pub fn encode(&self) -> Result<EncodedBody> {
		#[derive(Serialize)]
		struct Wire<'a> {
			grant_type: &'static str,
			client_id: &'a str,
			client_secret: &'a str,
			code: &'a str,
			redirect_uri: &'a str,
			#[serde(skip_serializing_if = "Option::is_none")]
			code_verifier: Option<&'a str>,
			#[serde(skip_serializing_if = "Option::is_none")]
			scope: Option<String>,
		}

		encode_json(&Wire {
			grant_type: GrantType::AuthorizationCode.as_str(),
			client_id: &self.client_id,
			client_secret: self.client_secret.expose(),
			code: self.code.expose(),
			redirect_uri: self.redirect_uri.as_str(),
			code_verifier: self.code_verifier.as_ref().map(TokenSecret::expose),
			scope: optional_scope(&self.scope),
		})
	}
}

/// Grant submitted to the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenGrant {
	/// `grant_type=client_credentials`, form-encoded.
	ClientCredentials(ClientCredentials),
	/// `grant_type=refresh_token`, JSON-encoded.
	RefreshToken(RefreshTokenCredentials),
	/// `grant_type=authorization_code`, JSON-encoded.
	AuthorizationCode(AuthorizationCodeCredentials),
}
impl TokenGrant {
	/// Returns the grant type carried by this request.
	pub fn grant_type(&self) -> GrantType {
		match self {
			Self::ClientCredentials(_) => GrantType::ClientCredentials,
			Self::RefreshToken(_) => GrantType::RefreshToken,
			Self::AuthorizationCode(_) => GrantType::AuthorizationCode,
		}
	}

	/// Encodes the request body using the variant's wire format.
	pub fn encode(&self) -> Result<EncodedBody> {
		match self {
			Self::ClientCredentials(credentials) => Ok(credentials.encode()),
			Self::RefreshToken(credentials) => credentials.encode(),
			Self::AuthorizationCode(credentials) => credentials.encode(),
		}
	}
}
impl From<ClientCredentials> for TokenGrant {
	fn from(value: ClientCredentials) -> Self {
		Self::ClientCredentials(value)
	}
}
impl From<RefreshTokenCredentials> for TokenGrant {
	fn from(value: RefreshTokenCredentials) -> Self {
		Self::RefreshToken(value)
	}
}
impl From<AuthorizationCodeCredentials> for TokenGrant {
	fn from(value: AuthorizationCodeCredentials) -> Self {
		Self::AuthorizationCode(value)
	}
}

/// Hint describing which kind of token is being revoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTypeHint {
	/// The token is an access token.
	AccessToken,
	/// The token is a refresh token.
	RefreshToken,
}
impl TokenTypeHint {
	/// Returns the RFC 7009 identifier for the hint.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenTypeHint::AccessToken => "access_token",
			TokenTypeHint::RefreshToken => "refresh_token",
		}
	}
}

/// Token revocation request sent to the `/revoke` endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRevokeRequest {
	/// Token to revoke.
	pub token: TokenSecret,
	/// Optional hint about the token's type.
	pub token_type_hint: Option<TokenTypeHint>,
}
impl TokenRevokeRequest {
	/// Creates a revocation request without a type hint.
	pub fn new(token: impl Into<TokenSecret>) -> Self {
		Self { token: token.into(), token_type_hint: None }
	}

	/// Adds a type hint.
	pub fn with_hint(mut self, hint: TokenTypeHint) -> Self {
		self.token_type_hint = Some(hint);

		self
	}

	/// Encodes the request as `application/x-www-form-urlencoded`.
	pub fn encode(&self) -> EncodedBody {
		let mut form = FormSerializer::new(String::new());

		form.append_pair("token", self.token.expose());

		if let Some(hint) = self.token_type_hint {
			form.append_pair("token_type_hint", hint.as_str());
		}

		EncodedBody { content_type: APPLICATION_FORM, body: form.finish().into_bytes() }
	}
}

fn optional_scope(scope: &ScopeSet) -> Option<String> {
	if scope.is_empty() { None } else { Some(scope.normalized()) }
}

fn encode_json<T>(wire: &T) -> Result<EncodedBody>
where
	T: Serialize,
{
	let body = serde_json::to_vec(wire).map_err(SerializationError::encode)?;

	Ok(EncodedBody { content_type: APPLICATION_JSON, body })
}
