//! JSON bodies exchanged with the token issuer.

// self
use crate::{_prelude::*, error::TokenError, http::scalar_string};

/// Challenge served by `GET /auth/cert/key`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChallengeMessage {
	/// Challenge identifier echoed back in the exchange.
	pub uuid: String,
	/// Payload to sign.
	pub data: String,
}

/// Body of `POST /auth/cert`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedChallenge {
	/// Identifier copied from the [`ChallengeMessage`].
	pub uuid: String,
	/// Base64 of the signed payload.
	pub data: String,
}
impl SignedChallenge {
	/// Renders the JSON request body; two string fields cannot fail to encode.
	pub fn to_body(&self) -> Vec<u8> {
		serde_json::json!({ "uuid": self.uuid, "data": self.data }).to_string().into_bytes()
	}
}

/// Response of `POST /auth/cert`; `token` is absent on failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
	/// Issued bearer token.
	pub token: Option<String>,
	/// Issuer status code; numeric codes are kept as their decimal spelling.
	#[serde(deserialize_with = "scalar_string")]
	pub code: Option<String>,
	/// Issuer error message.
	pub error_message: Option<String>,
	/// Issuer error description.
	pub description: Option<String>,
}
impl TokenResponse {
	/// Splits the response into the token or the issuer diagnostics.
	pub fn into_token(self) -> Result<String, TokenError> {
		match self.token {
			Some(token) if !token.is_empty() => Ok(token),
			_ => Err(TokenError {
				code: self.code,
				error_message: self.error_message,
				description: self.description,
			}),
		}
	}
}
