//! Client-level error types shared across the limiter, token manager, and dispatcher.
//!
//! Every variant is `Clone` so a single failed token refresh can be handed to each caller
//! that was waiting on it. Sources that are not clonable themselves live behind [`Arc`].

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type SharedError = Arc<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Clone, Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Submission rejected before scheduling.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Issuer answered but did not hand out a token.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	HttpRequest(#[from] HttpRequestError),
	/// Upstream answered with a body the client could not read.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Challenge signer refused or failed to sign.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Worker pool failed to resolve a submission.
	#[error(transparent)]
	Dispatch(#[from] DispatchError),
}

/// Configuration failures raised while constructing a client.
#[derive(Clone, Debug, ThisError)]
pub enum ConfigError {
	/// Rate limit parameters are out of range.
	#[error("Rate limit is invalid: {reason}.")]
	InvalidRateLimit {
		/// Human-readable description of the offending parameter.
		reason: &'static str,
	},
	/// Token lifetime parameters are out of range.
	#[error("Token lifetime is invalid: {reason}.")]
	InvalidTokenLifetime {
		/// Human-readable description of the offending parameter.
		reason: &'static str,
	},
	/// An endpoint URL could not be derived from the configured base.
	#[error("Endpoint `{endpoint}` cannot be derived from the configured base URL.")]
	InvalidEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: SharedError,
	},
	/// Document payload could not be serialized.
	#[error("Document payload could not be encoded.")]
	DocumentEncode {
		/// Underlying serialization failure.
		#[source]
		source: Arc<serde_json::Error>,
	},
	/// Worker pool was built outside a Tokio runtime.
	#[error("A Tokio runtime is required to start the submission workers.")]
	NoRuntime,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Arc::new(src) }
	}
}
impl From<serde_json::Error> for ConfigError {
	fn from(e: serde_json::Error) -> Self {
		Self::DocumentEncode { source: Arc::new(e) }
	}
}

/// Submission rejected by the guard before it reached the worker pool.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// The document type/format pair is not accepted yet.
	#[error("Document type {document_type} with format {document_format} is not supported.")]
	UnsupportedDocument {
		/// Wire value of the rejected document type.
		document_type: String,
		/// Wire value of the rejected document format.
		document_format: String,
	},
	/// Signature material is empty.
	#[error("Submission signature must not be empty.")]
	MissingSignature,
}

/// Issuer responded to the token exchange without a token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenError {
	/// Issuer-supplied status code, if any.
	pub code: Option<String>,
	/// Issuer-supplied error message, if any.
	pub error_message: Option<String>,
	/// Issuer-supplied description, if any.
	pub description: Option<String>,
}
impl TokenError {
	fn summary(&self) -> String {
		let parts = [
			self.code.as_deref().map(|v| format!("code={v}")),
			self.error_message.as_deref().map(|v| format!("error_message={v}")),
			self.description.as_deref().map(|v| format!("description={v}")),
		];
		let parts = parts.into_iter().flatten().collect::<Vec<_>>();

		if parts.is_empty() { "no diagnostics supplied".into() } else { parts.join(", ") }
	}
}
impl Display for TokenError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Issuer responded without a token: {}.", self.summary())
	}
}
impl StdError for TokenError {}

/// Network step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpStage {
	/// `GET {issuer}/auth/cert/key`.
	Challenge,
	/// `POST {issuer}/auth/cert`.
	TokenExchange,
	/// `POST {submission-host}/lk/documents/create`.
	Submission,
}
impl HttpStage {
	/// Returns a stable label suitable for logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpStage::Challenge => "challenge",
			HttpStage::TokenExchange => "token_exchange",
			HttpStage::Submission => "submission",
		}
	}
}
impl Display for HttpStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Clone, Debug, ThisError)]
pub enum HttpRequestError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during the {stage} request.")]
	Network {
		/// Failed step.
		stage: HttpStage,
		/// Transport-specific network error.
		#[source]
		source: SharedError,
	},
	/// Request exceeded the configured timeout.
	#[error("The {stage} request timed out.")]
	Timeout {
		/// Failed step.
		stage: HttpStage,
	},
}
impl HttpRequestError {
	/// Wraps a transport-specific network error.
	pub fn network(stage: HttpStage, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { stage, source: Arc::new(src) }
	}

	/// Classifies a reqwest failure for the given stage.
	pub fn from_reqwest(stage: HttpStage, e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout { stage } } else { Self::network(stage, e) }
	}

	/// Returns the step that failed.
	pub fn stage(&self) -> HttpStage {
		match self {
			Self::Network { stage, .. } | Self::Timeout { stage } => *stage,
		}
	}
}

/// Upstream answered with a body that does not match the expected shape.
#[derive(Clone, Debug, ThisError)]
pub enum ResponseError {
	/// Response JSON could not be parsed.
	#[error("The {stage} response contained malformed JSON.")]
	Parse {
		/// Step whose response failed to parse.
		stage: HttpStage,
		/// Structured parsing failure.
		#[source]
		source: Arc<serde_path_to_error::Error<serde_json::Error>>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Failure reported by a [`ChallengeSigner`](crate::token::ChallengeSigner).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Challenge could not be signed: {reason}.")]
pub struct SigningError {
	/// Signer-supplied reason string.
	pub reason: String,
}
impl SigningError {
	/// Creates a signing failure with the given reason.
	pub fn new(reason: impl Into<String>) -> Self {
		Self { reason: reason.into() }
	}
}

/// Worker pool failures surfaced through a submission handle.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DispatchError {
	/// Dispatcher no longer accepts work.
	#[error("Dispatcher is shut down and no longer accepts submissions.")]
	Closed,
	/// Unit of work ended without resolving its handle.
	#[error("Worker ended without resolving the submission: {reason}.")]
	WorkerLost {
		/// Short description of why the unit of work ended.
		reason: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_error_lists_supplied_diagnostics() {
		let err = TokenError {
			code: Some("401".into()),
			error_message: Some("expired cert".into()),
			description: None,
		};

		assert_eq!(
			err.to_string(),
			"Issuer responded without a token: code=401, error_message=expired cert."
		);
		assert_eq!(
			TokenError::default().to_string(),
			"Issuer responded without a token: no diagnostics supplied."
		);
	}

	#[test]
	fn http_request_error_reports_stage() {
		let err = Error::from(HttpRequestError::Timeout { stage: HttpStage::TokenExchange });

		assert_eq!(err.to_string(), "The token_exchange request timed out.");

		let Error::HttpRequest(inner) = err.clone() else {
			panic!("Timeout should map to the HttpRequest variant.");
		};

		assert_eq!(inner.stage(), HttpStage::TokenExchange);
	}
}
