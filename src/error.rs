//! Crate-level error types shared by the USPS clients, the token layer, and the HTTP front.

// self
use crate::{_prelude::*, auth::StandardErrorResponse};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The client was default-constructed and has no transport or token provider.
	#[error("Client not initialized.")]
	NotInitialized,
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Bearer token could not be acquired.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, timeout, cancellation).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream answered with a non-2xx status.
	#[error(transparent)]
	Remote(#[from] RemoteError),
	/// Local encoding or decoding failure.
	#[error(transparent)]
	Serialization(#[from] SerializationError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error("HTTP request could not be constructed.")]
	HttpRequest {
		/// Underlying request builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot carry path segments.
	#[error("Base URL `{url}` cannot be used as an API root.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Base URL or override could not be parsed.
	#[error("URL could not be parsed.")]
	UrlParse(#[from] url::ParseError),
	/// OAuth client credentials were not supplied.
	#[error("OAuth client credentials are missing: {field}.")]
	MissingCredentials {
		/// Name of the missing setting.
		field: &'static str,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Service settings could not be loaded.
	#[error("Service configuration could not be loaded.")]
	Load {
		/// Underlying provider or extraction failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a request builder failure inside [`ConfigError`].
	pub fn http_request(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpRequest { source: Box::new(src) }
	}

	/// Wraps a settings loader failure inside [`ConfigError`].
	pub fn load(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Load { source: Box::new(src) }
	}
}

/// Token acquisition failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// The token provider failed to produce a bearer token.
	#[error("Failed to acquire an OAuth token.")]
	TokenAcquisition {
		/// Provider failure that caused the outage.
		#[source]
		source: Box<Error>,
	},
}
impl AuthError {
	/// Wraps a token provider failure.
	pub fn token_acquisition(src: Error) -> Self {
		Self::TokenAcquisition { source: Box::new(src) }
	}

	/// Returns the provider failure that caused this error.
	pub fn cause(&self) -> &Error {
		match self {
			Self::TokenAcquisition { source } => source,
		}
	}
}

/// Transport-level failures (network, IO, timeout, cancellation).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the USPS API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The configured transport timeout elapsed.
	#[error("Request to the USPS API timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// The caller cancelled the operation before it finished.
	#[error("Request to the USPS API was cancelled.")]
	Cancelled,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Non-2xx response from a USPS endpoint.
///
/// The body is decoded on a best-effort basis; a body that is not JSON leaves
/// [`RemoteError::body`] empty without hiding the status.
#[derive(Debug, ThisError)]
#[error("USPS API responded with HTTP {status}{}.", describe_body(.body.as_ref()))]
pub struct RemoteError {
	/// HTTP status code returned by the upstream.
	pub status: u16,
	/// Best-effort decoded error body.
	pub body: Option<serde_json::Value>,
	/// Retry-After hint from upstream, if supplied.
	pub retry_after: Option<Duration>,
}
impl RemoteError {
	/// Builds an error from the status and the raw body bytes.
	pub fn from_body(status: u16, body: &[u8], retry_after: Option<Duration>) -> Self {
		Self { status, body: serde_json::from_slice(body).ok(), retry_after }
	}

	/// Returns true for 4xx statuses.
	pub fn is_client_error(&self) -> bool {
		(400..500).contains(&self.status)
	}

	/// Interprets the body as an OAuth-style `error`/`error_description` payload.
	pub fn oauth_error(&self) -> Option<StandardErrorResponse> {
		self.body
			.as_ref()
			.and_then(|value| StandardErrorResponse::deserialize(value).ok())
			.filter(|response| !response.error.is_empty())
	}
}

/// Local encoding and decoding failures.
#[derive(Debug, ThisError)]
pub enum SerializationError {
	/// Request body could not be encoded.
	#[error("Request body could not be encoded.")]
	Encode {
		/// Underlying serializer failure.
		#[source]
		source: BoxError,
	},
	/// Response body could not be decoded.
	#[error("Response body could not be decoded at `{path}`.")]
	Decode {
		/// JSON path at which decoding failed.
		path: String,
		/// Underlying deserializer failure.
		#[source]
		source: serde_json::Error,
	},
}
impl SerializationError {
	/// Wraps an encoder failure.
	pub fn encode(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Encode { source: Box::new(src) }
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for SerializationError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Decode { path, source: e.into_inner() }
	}
}

fn describe_body(body: Option<&serde_json::Value>) -> String {
	let Some(value) = body else {
		return String::new();
	};

	match StandardErrorResponse::deserialize(value) {
		Ok(response) if !response.error.is_empty() => match response.error_description {
			Some(description) if !description.is_empty() =>
				format!(": {}: {description}", response.error),
			_ => format!(": {}", response.error),
		},
		_ => String::new(),
	}
}
