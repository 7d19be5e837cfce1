//! Transport primitives shared by the token manager and the submission dispatcher.
//!
//! [`ReqwestHttpClient`] wraps a single connection pool sized to the worker count, so no
//! worker waits on a connection held by a sibling. Bodies are read in full and decoded
//! with `serde_path_to_error`, which keeps the failing JSON path in parse errors.

// std
use std::ops::Deref;
// crates.io
use reqwest::{RequestBuilder, redirect::Policy};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ConfigError, HttpRequestError, HttpStage, ResponseError},
};

/// `Accept` header value expected by every CRPT endpoint.
pub const ACCEPT_JSON: &str = "application/json;charset=UTF-8";

/// Metadata captured from the most recent HTTP response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint.
	pub status: Option<u16>,
}

/// Fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
	/// Step that produced the response.
	pub stage: HttpStage,
	/// Status and related metadata.
	pub metadata: ResponseMetadata,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Decodes the body as JSON, reporting the failing field path on error.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			ResponseError::Parse {
				stage: self.stage,
				source: Arc::new(source),
				status: self.metadata.status,
			}
			.into()
		})
	}
}

/// Decodes a status-like field that CRPT hosts send either as a string or as a bare number.
///
/// Numbers and booleans keep their JSON spelling (`401` becomes `"401"`); `null` and absent
/// fields become `None`.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	match Option::<serde_json::Value>::deserialize(deserializer)? {
		None | Some(serde_json::Value::Null) => Ok(None),
		Some(serde_json::Value::String(s)) => Ok(Some(s)),
		Some(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) =>
			Ok(Some(v.to_string())),
		Some(_) => Err(serde::de::Error::custom("expected a string, number, or boolean")),
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Redirects are not followed; CRPT endpoints answer directly.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose idle pool and timeouts follow `config`.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let pool = usize::try_from(config.rate.admissions).unwrap_or(usize::MAX);
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.pool_max_idle_per_host(pool)
			.connect_timeout(config.connect_timeout)
			.timeout(config.request_timeout)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Sends `request` and buffers the response body.
	///
	/// Non-success statuses are returned as responses; the CRPT API reports failures in the
	/// JSON body, so classification is left to the caller.
	pub async fn send(&self, stage: HttpStage, request: RequestBuilder) -> Result<HttpResponse> {
		let response = request
			.header(reqwest::header::ACCEPT, ACCEPT_JSON)
			.send()
			.await
			.map_err(|e| HttpRequestError::from_reqwest(stage, e))?;
		let metadata = ResponseMetadata { status: Some(response.status().as_u16()) };
		let body = response
			.bytes()
			.await
			.map_err(|e| HttpRequestError::from_reqwest(stage, e))?
			.to_vec();

		Ok(HttpResponse { stage, metadata, body })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Challenge {
		#[allow(dead_code)]
		uuid: String,
	}

	fn response(body: &str) -> HttpResponse {
		HttpResponse {
			stage: HttpStage::Challenge,
			metadata: ResponseMetadata { status: Some(502) },
			body: body.as_bytes().to_vec(),
		}
	}

	#[test]
	fn json_reports_path_and_status_on_parse_failure() {
		let err = response("{\"uuid\":7}")
			.json::<Challenge>()
			.expect_err("A numeric uuid should fail to decode.");
		let Error::Response(ResponseError::Parse { stage, source, status }) = err else {
			panic!("Parse failures should map to ResponseError::Parse.");
		};

		assert_eq!(stage, HttpStage::Challenge);
		assert_eq!(status, Some(502));
		assert_eq!(source.path().to_string(), "uuid");
	}

	#[derive(Debug, Default, Deserialize)]
	#[serde(default)]
	struct Status {
		#[serde(deserialize_with = "scalar_string")]
		code: Option<String>,
	}

	#[test]
	fn scalar_string_accepts_strings_and_numbers() {
		let parse = |body: &str| response(body).json::<Status>().map(|status| status.code);
		let text = parse("{\"code\":\"401\"}").expect("String codes should parse.");
		let number = parse("{\"code\":401}").expect("Numeric codes should parse.");

		assert_eq!(text, Some("401".into()));
		assert_eq!(number, Some("401".into()));
		assert_eq!(parse("{\"code\":null}").expect("Null codes should parse."), None);
		assert_eq!(parse("{}").expect("Missing codes should parse."), None);
		assert!(parse("{\"code\":[1]}").is_err());
	}

	#[test]
	fn client_builds_from_default_config() {
		ReqwestHttpClient::from_config(&ClientConfig::default())
			.expect("Default configuration should produce an HTTP client.");
	}
}
