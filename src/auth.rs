//! USPS OAuth 2.0 support: grant encodings, token responses, the token client, and the
//! bearer token providers consumed by the API clients.

pub mod client;
pub mod grant;
pub mod provider;
pub mod response;
pub mod scope;
pub mod secret;

pub use client::*;
pub use grant::*;
pub use provider::*;
pub use response::*;
pub use scope::*;
pub use secret::*;
