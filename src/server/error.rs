//! Error envelope written by the handlers.

// crates.io
use axum::{
	Json,
	extract::rejection::{JsonRejection, QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde_json::{Value, json};
// self
use crate::{_prelude::*, error::TransportError};

/// Failure produced by a handler.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// The inbound body or query string was rejected.
	#[error("{0}")]
	BadRequest(String),
	/// A client call failed.
	#[error(transparent)]
	Client(#[from] Error),
}
impl ApiError {
	/// HTTP status written for this failure.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::BadRequest(_) => StatusCode::BAD_REQUEST,
			Self::Client(e) => status_for(e),
		}
	}

	/// Stable machine-readable code written to the `error` field.
	pub fn code(&self) -> &'static str {
		match self {
			Self::BadRequest(_) => "bad_request",
			Self::Client(Error::Remote(remote)) if remote.is_client_error() => "upstream_rejected",
			Self::Client(Error::Remote(_)) => "upstream_failed",
			Self::Client(Error::Auth(_)) => "token_unavailable",
			Self::Client(Error::Transport(TransportError::Timeout { .. })) => "upstream_timeout",
			Self::Client(Error::Transport(TransportError::Cancelled)) => "cancelled",
			Self::Client(Error::Transport(_)) => "upstream_unreachable",
			Self::Client(_) => "internal",
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::BadRequest(rejection.body_text())
	}
}
impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::BadRequest(rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let mut body = json!({ "error": self.code(), "message": self.to_string() });

		if let Self::Client(Error::Remote(remote)) = &self {
			body["upstreamStatus"] = Value::from(remote.status);

			if let Some(upstream) = &remote.body {
				body["upstream"] = upstream.clone();
			}
		}
		if status.is_server_error() {
			tracing::error!(status = status.as_u16(), error = %self, "Request failed.");
		} else {
			tracing::info!(status = status.as_u16(), error = %self, "Request rejected.");
		}

		(status, Json(body)).into_response()
	}
}

/// Maps a client error to the HTTP status returned to the caller.
///
/// Upstream 4xx answers are relayed as-is; every other upstream or transport failure is a
/// gateway error, and local failures are internal errors.
pub fn status_for(error: &Error) -> StatusCode {
	match error {
		Error::Remote(remote) if remote.is_client_error() =>
			StatusCode::from_u16(remote.status).unwrap_or(StatusCode::BAD_GATEWAY),
		Error::Remote(_) | Error::Auth(_) => StatusCode::BAD_GATEWAY,
		Error::Transport(TransportError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
		Error::Transport(_) => StatusCode::BAD_GATEWAY,
		Error::Serialization(_) | Error::Config(_) | Error::NotInitialized =>
			StatusCode::INTERNAL_SERVER_ERROR,
	}
}
